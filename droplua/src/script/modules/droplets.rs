//! Droplets resource module
//!
//! Exposes the droplets API family as `cloud.droplets`. Backed
//! operations: `list` (synchronous pagination), `get`, `create`,
//! `delete`. The remaining declared operations throw the
//! "not implemented!" sentinel.

use std::sync::Arc;

use anyhow::Result;
use chrono::SecondsFormat;
use mlua::{Function, Lua, LuaSerdeExt, Result as LuaResult, Table, Value};
use tokio::runtime::Handle;

use crate::api::models::{Droplet, DropletCreateRequest, ImageRef, ListOptions, SshKeyRef};
use crate::api::DropletsService;
use crate::script::convert::{
    field, opt_bool_field, opt_integer_field, opt_string_field, resolve_id, runtime_err,
    string_field, throw,
};

use super::{build_module, not_implemented_fn, PER_PAGE};

const ID_SHAPE: &str = "argument must be a Droplet or a DropletID";

/// Build the droplets module table.
pub fn register(lua: &Lua, svc: Arc<dyn DropletsService>, handle: Handle) -> Result<Table> {
    build_module(
        lua,
        vec![
            ("list", list_fn(lua, svc.clone(), handle.clone())),
            ("list_by_tag", not_implemented_fn(lua)),
            ("get", get_fn(lua, svc.clone(), handle.clone())),
            ("create", create_fn(lua, svc.clone(), handle.clone())),
            ("create_multiple", not_implemented_fn(lua)),
            ("delete", delete_fn(lua, svc, handle)),
            ("delete_by_tag", not_implemented_fn(lua)),
            ("kernels", not_implemented_fn(lua)),
            ("snapshots", not_implemented_fn(lua)),
            ("backups", not_implemented_fn(lua)),
            ("actions", not_implemented_fn(lua)),
            ("neighbors", not_implemented_fn(lua)),
        ],
    )
}

/// get(idOrDroplet) -> droplet
fn get_fn(lua: &Lua, svc: Arc<dyn DropletsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |lua, arg: Value| {
        let id = resolve_id(&arg, ID_SHAPE)?;
        let droplet = handle.block_on(svc.get(id)).map_err(runtime_err)?;
        Ok(Value::Table(project_droplet(lua, &droplet)?))
    })
}

/// list() -> array of droplets
///
/// Fetch-accumulate-continue across pages; continues only while the
/// response declares more pages. A transport error on any page aborts
/// the whole call, discarding pages already accumulated.
fn list_fn(lua: &Lua, svc: Arc<dyn DropletsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |lua, ()| {
        let mut opts = ListOptions { page: 1, per_page: PER_PAGE };
        let mut droplets: Vec<Value> = Vec::new();
        loop {
            let page = handle.block_on(svc.list(&opts)).map_err(runtime_err)?;
            for droplet in &page.items {
                droplets.push(Value::Table(project_droplet(lua, droplet)?));
            }
            if page.has_more {
                opts.page += 1;
            } else {
                break;
            }
        }
        lua.create_sequence_from(droplets)
    })
}

/// create(spec) -> droplet
///
/// Validates the required nested sub-objects before building the
/// request, then assembles it field by field, converting each `ssh_keys`
/// entry independently.
fn create_fn(lua: &Lua, svc: Arc<dyn DropletsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |lua, arg: Value| {
        let Value::Table(spec) = arg else {
            return throw("argument must be an object");
        };

        let Value::Table(image) = field(&spec, "image")? else {
            return throw("object must contain an 'image' field");
        };
        let Value::Table(ssh_keys) = field(&spec, "ssh_keys")? else {
            return throw("object must contain an 'ssh_keys' field");
        };

        let mut request = DropletCreateRequest {
            name: string_field(&spec, "name")?,
            region: string_field(&spec, "region")?,
            size: string_field(&spec, "size")?,
            image: ImageRef {
                id: opt_integer_field(&image, "id")?,
                slug: opt_string_field(&image, "slug")?,
            },
            ssh_keys: Vec::new(),
            backups: opt_bool_field(&spec, "backups")?,
            ipv6: opt_bool_field(&spec, "ipv6")?,
            private_networking: opt_bool_field(&spec, "private_networking")?,
            user_data: opt_string_field(&spec, "user_data")?,
        };

        for entry in ssh_keys.sequence_values::<Value>() {
            let Value::Table(key) = entry? else {
                return throw("'ssh_keys' entries must be objects");
            };
            request.ssh_keys.push(SshKeyRef {
                id: opt_integer_field(&key, "id")?,
                fingerprint: opt_string_field(&key, "fingerprint")?,
            });
        }

        let droplet = handle.block_on(svc.create(&request)).map_err(runtime_err)?;
        Ok(Value::Table(project_droplet(lua, &droplet)?))
    })
}

/// delete(idOrDroplet) -> nil
fn delete_fn(lua: &Lua, svc: Arc<dyn DropletsService>, handle: Handle) -> LuaResult<Function> {
    lua.create_function(move |_, arg: Value| {
        let id = resolve_id(&arg, ID_SHAPE)?;
        handle.block_on(svc.delete(id)).map_err(runtime_err)?;
        Ok(Value::Nil)
    })
}

/// Project a droplet record into a script object.
///
/// The field set is fixed and total: every declared field is always
/// present, and any single conversion failure aborts the whole
/// projection — partial objects are never returned.
pub fn project_droplet(lua: &Lua, d: &Droplet) -> LuaResult<Table> {
    let object = lua.create_table()?;
    let fields: [(&str, Value); 16] = [
        ("id", Value::Integer(d.id)),
        ("name", lua.to_value(&d.name)?),
        ("memory", Value::Integer(d.memory)),
        ("vcpus", Value::Integer(d.vcpus)),
        ("disk", Value::Integer(d.disk)),
        ("region", lua.to_value(&d.region)?),
        ("image", lua.to_value(&d.image)?),
        ("size", lua.to_value(&d.size)?),
        ("size_slug", lua.to_value(&d.size_slug)?),
        ("backup_ids", lua.to_value(&d.backup_ids)?),
        ("snapshot_ids", lua.to_value(&d.snapshot_ids)?),
        ("locked", Value::Boolean(d.locked)),
        ("status", lua.to_value(&d.status)?),
        ("networks", lua.to_value(&d.networks)?),
        (
            "created_at",
            lua.to_value(&d.created_at.to_rfc3339_opts(SecondsFormat::Secs, true))?,
        ),
        ("kernel", lua.to_value(&d.kernel)?),
    ];
    for (name, value) in fields {
        object.set(name, value)?;
    }
    Ok(object)
}
