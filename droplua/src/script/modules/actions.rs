//! Actions resource module
//!
//! Exposes the actions (audit event) API family as `cloud.actions`. The
//! `list` operation is the streaming shape: a producer task publishes
//! records over a channel while the script-thread consumer drains and
//! projects them.

use std::sync::Arc;

use anyhow::Result;
use chrono::SecondsFormat;
use mlua::{Function, Lua, LuaSerdeExt, Result as LuaResult, Table, Value};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::api::models::{Action, ListOptions};
use crate::api::{ActionsService, ApiError};
use crate::script::convert::{resolve_id, runtime_err, throw};

use super::{build_module, PER_PAGE};

const ID_SHAPE: &str = "argument must be an Action or an ActionID";

/// Build the actions module table.
pub fn register(lua: &Lua, svc: Arc<dyn ActionsService>, handle: Handle) -> Result<Table> {
    build_module(
        lua,
        vec![
            ("get", get_fn(lua, svc.clone(), handle.clone())),
            ("list", list_fn(lua, svc, handle)),
        ],
    )
}

/// get(idOrAction) -> action
fn get_fn(lua: &Lua, svc: Arc<dyn ActionsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |lua, arg: Value| {
        let id = resolve_id(&arg, ID_SHAPE)?;
        let action = handle.block_on(svc.get(id)).map_err(runtime_err)?;
        Ok(Value::Table(project_action(lua, &action)?))
    })
}

/// list() -> array of actions
///
/// Spawns a producer that pages through the client and emits records one
/// at a time; the consumer drains them in emission order. The producer
/// and consumer only share the two channels.
fn list_fn(lua: &Lua, svc: Arc<dyn ActionsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |lua, ()| {
        let (records_tx, records_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        let svc = svc.clone();

        handle.spawn(async move {
            let result: Result<(), ApiError> = async {
                let mut opts = ListOptions { page: 1, per_page: PER_PAGE };
                loop {
                    let page = svc.list(&opts).await?;
                    for action in page.items {
                        if records_tx.send(action).is_err() {
                            // consumer bailed out mid-drain
                            return Ok(());
                        }
                    }
                    if page.has_more {
                        opts.page += 1;
                    } else {
                        return Ok(());
                    }
                }
            }
            .await;
            let _ = done_tx.send(result);
        });

        let actions = collect_stream(lua, records_rx, done_rx)?;
        lua.create_sequence_from(actions)
    })
}

/// Drain the record channel fully, projecting in emission order, then
/// inspect the terminal signal. A terminal error discards every record
/// already projected: the script sees a full array or an exception,
/// never a partial result.
fn collect_stream(
    lua: &Lua,
    mut records: mpsc::UnboundedReceiver<Action>,
    done: oneshot::Receiver<Result<(), ApiError>>,
) -> LuaResult<Vec<Value>> {
    let mut actions = Vec::new();
    while let Some(action) = records.blocking_recv() {
        actions.push(Value::Table(project_action(lua, &action)?));
    }
    match done.blocking_recv() {
        Ok(Ok(())) => Ok(actions),
        Ok(Err(err)) => Err(runtime_err(err)),
        Err(_) => throw("action stream closed without a completion signal"),
    }
}

/// Project an action record into a script object. Identifiers widen to
/// i64; timestamps serialize as RFC 3339 UTC. The field set is fixed and
/// total.
pub fn project_action(lua: &Lua, a: &Action) -> LuaResult<Table> {
    let object = lua.create_table()?;
    let completed_at = match &a.completed_at {
        Some(t) => lua.to_value(&t.to_rfc3339_opts(SecondsFormat::Secs, true))?,
        None => Value::NULL,
    };
    let fields: [(&str, Value); 8] = [
        ("id", Value::Integer(a.id)),
        ("status", lua.to_value(&a.status)?),
        ("type", lua.to_value(&a.kind)?),
        (
            "started_at",
            lua.to_value(&a.started_at.to_rfc3339_opts(SecondsFormat::Secs, true))?,
        ),
        ("completed_at", completed_at),
        ("resource_id", Value::Integer(a.resource_id)),
        ("resource_type", lua.to_value(&a.resource_type)?),
        ("region_slug", lua.to_value(&a.region_slug)?),
    ];
    for (name, value) in fields {
        object.set(name, value)?;
    }
    Ok(object)
}
