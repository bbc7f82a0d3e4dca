//! Script-visible resource modules
//!
//! One module per API resource family, each a table of host-callable
//! functions built by the purely structural [`build_module`] registrar.

pub mod actions;
pub mod droplets;

use anyhow::{Context, Result};
use mlua::{Function, Lua, Result as LuaResult, Table, Value};

use super::convert::throw;

/// Records fetched per page on list calls.
pub const PER_PAGE: u32 = 200;

/// Build a fresh module table and bind each (name, method) pair under
/// that exact name. A binding failure fails the whole module build with a
/// setup error — never a script exception, since this runs before any
/// script executes.
pub fn build_module(
    lua: &Lua,
    methods: Vec<(&'static str, LuaResult<Function>)>,
) -> Result<Table> {
    let module = lua.create_table().context("creating module table")?;
    for (name, method) in methods {
        let method = method.with_context(|| format!("preparing method {:?}", name))?;
        module
            .set(name, method)
            .with_context(|| format!("preparing method {:?}", name))?;
    }
    Ok(module)
}

/// Placeholder for operations declared in a method table but not yet
/// backed by real logic. The message text is a stable contract: scripts
/// detect unimplemented operations by it.
pub fn not_implemented_fn(lua: &Lua) -> LuaResult<Function> {
    lua.create_function(|_, _: mlua::MultiValue| -> LuaResult<Value> { throw("not implemented!") })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    #[test]
    fn test_build_module_binds_under_exact_names() {
        let lua = Lua::new();
        let module = build_module(
            &lua,
            vec![
                ("ping", lua.create_function(|_, ()| Ok(1))),
                ("pong", lua.create_function(|_, ()| Ok(2))),
            ],
        )
        .unwrap();

        lua.globals().set("m", module).unwrap();
        let result: i64 = lua.load("return m.ping() + m.pong()").eval().unwrap();
        assert_eq!(result, 3);
    }

    #[test]
    fn test_build_module_surfaces_setup_error_with_method_name() {
        let lua = Lua::new();
        let err = build_module(
            &lua,
            vec![(
                "broken",
                Err(mlua::Error::RuntimeError("boom".into())),
            )],
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("preparing method \"broken\""));
    }

    #[test]
    fn test_not_implemented_sentinel() {
        let lua = Lua::new();
        let f = not_implemented_fn(&lua).unwrap();
        lua.globals().set("f", f).unwrap();

        let err: String = lua
            .load("local ok, err = pcall(f); return tostring(err)")
            .eval()
            .unwrap();
        assert!(err.contains("not implemented!"));
    }
}
