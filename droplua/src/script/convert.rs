//! Lua value coercion utilities
//!
//! Centralizes the throw-on-bad-shape policy for the scripting bridge:
//! coercions succeed only for values already of the expected Lua shape and
//! raise a script-visible error otherwise. Field lookup is the one
//! deliberate asymmetry — a missing field yields `Value::Nil` instead of
//! failing, so call sites can throw resource-specific messages.

use mlua::{Error, Result as LuaResult, Table, Value};

/// Raise a script-visible exception carrying `msg`.
///
/// The returned error unwinds the current host-callable function; mlua
/// delivers it to the script as an ordinary Lua error, catchable with
/// `pcall`.
pub fn throw<T>(msg: impl Into<String>) -> LuaResult<T> {
    Err(Error::RuntimeError(msg.into()))
}

/// Map a client or provider failure into a script exception, message
/// passed through verbatim.
pub fn runtime_err(err: impl std::fmt::Display) -> Error {
    Error::RuntimeError(err.to_string())
}

/// Coerce a numeric Lua value to i64, truncating floats.
pub fn as_integer(value: &Value) -> LuaResult<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Number(n) => Ok(*n as i64),
        _ => throw("not a number"),
    }
}

/// Coerce a string-shaped Lua value.
pub fn as_string(value: &Value) -> LuaResult<String> {
    match value {
        Value::String(s) => Ok(s.to_str()?.to_string()),
        _ => throw("not a string"),
    }
}

/// Coerce a boolean Lua value.
pub fn as_boolean(value: &Value) -> LuaResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        _ => throw("not a boolean"),
    }
}

/// Look up a named field on a script object. Absence yields `Value::Nil`,
/// not an error.
pub fn field(table: &Table, name: &str) -> LuaResult<Value> {
    table.get::<Value>(name)
}

/// The two accepted shapes for an argument naming a resource: the bare
/// numeric identifier, or a record object carrying an `id` field.
pub enum IdArg {
    Scalar(i64),
    Record(Table),
}

/// Shape dispatch for identifier arguments; `None` means neither shape.
pub fn id_arg(value: &Value) -> Option<IdArg> {
    match value {
        Value::Integer(_) | Value::Number(_) => as_integer(value).ok().map(IdArg::Scalar),
        Value::Table(t) => Some(IdArg::Record(t.clone())),
        _ => None,
    }
}

/// Resolve an id-or-record argument to the numeric identifier. Shared by
/// every identifier-accepting operation; `shape_err` is the full message
/// for a shape violation ("argument must be a <Resource> or a
/// <Resource>ID").
pub fn resolve_id(value: &Value, shape_err: &str) -> LuaResult<i64> {
    match id_arg(value) {
        Some(IdArg::Scalar(id)) => Ok(id),
        Some(IdArg::Record(record)) => {
            let id = field(&record, "id")?;
            if matches!(id, Value::Integer(_) | Value::Number(_)) {
                as_integer(&id)
            } else {
                throw(shape_err)
            }
        }
        None => throw(shape_err),
    }
}

/// Required string field; names the field in the shape error.
pub fn string_field(table: &Table, name: &str) -> LuaResult<String> {
    match field(table, name)? {
        Value::String(s) => Ok(s.to_str()?.to_string()),
        _ => throw(format!("'{}' field must be a string", name)),
    }
}

/// Optional string field; absence means empty.
pub fn opt_string_field(table: &Table, name: &str) -> LuaResult<String> {
    match field(table, name)? {
        Value::Nil => Ok(String::new()),
        Value::String(s) => Ok(s.to_str()?.to_string()),
        _ => throw(format!("'{}' field must be a string", name)),
    }
}

/// Optional numeric field; absence means zero.
pub fn opt_integer_field(table: &Table, name: &str) -> LuaResult<i64> {
    match field(table, name)? {
        Value::Nil => Ok(0),
        v @ (Value::Integer(_) | Value::Number(_)) => as_integer(&v),
        _ => throw(format!("'{}' field must be a number", name)),
    }
}

/// Optional boolean field; absence means false.
pub fn opt_bool_field(table: &Table, name: &str) -> LuaResult<bool> {
    match field(table, name)? {
        Value::Nil => Ok(false),
        Value::Boolean(b) => Ok(b),
        _ => throw(format!("'{}' field must be a boolean", name)),
    }
}
