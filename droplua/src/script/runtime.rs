//! Script host: a sandboxed Lua runtime with the cloud modules bound
//!
//! Scripts see a single `cloud` global carrying one module per API
//! resource family. The host runs on the calling thread; API calls are
//! served by the tokio runtime whose handle is threaded through to the
//! modules.

use std::sync::Arc;

use anyhow::{Context, Result};
use mlua::{Lua, LuaOptions, StdLib};
use tokio::runtime::Handle;

use super::modules::{actions, droplets};
use crate::api::{ActionsService, DropletsService};

/// Memory ceiling for a script run.
const MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// A sandboxed Lua runtime for executing automation scripts.
pub struct ScriptHost {
    lua: Lua,
}

impl ScriptHost {
    /// Create the host and bind `cloud.droplets` / `cloud.actions`.
    ///
    /// Module binding failures abort construction with a setup error;
    /// they are never script exceptions since no script has run yet.
    pub fn new(
        droplets_svc: Arc<dyn DropletsService>,
        actions_svc: Arc<dyn ActionsService>,
        handle: Handle,
    ) -> Result<Self> {
        // No io, os, debug, or package: scripts reach the outside world
        // only through the cloud modules.
        let lua = Lua::new_with(
            StdLib::TABLE | StdLib::STRING | StdLib::MATH | StdLib::UTF8,
            LuaOptions::default(),
        )
        .context("Failed to create Lua runtime")?;
        lua.set_memory_limit(MEMORY_LIMIT)
            .context("applying script memory limit")?;

        let droplets_module = droplets::register(&lua, droplets_svc, handle.clone())
            .context("registering droplets module")?;
        let actions_module =
            actions::register(&lua, actions_svc, handle).context("registering actions module")?;

        let cloud = lua.create_table().context("creating cloud namespace")?;
        cloud
            .set("droplets", droplets_module)
            .context("binding droplets module")?;
        cloud
            .set("actions", actions_module)
            .context("binding actions module")?;
        lua.globals()
            .set("cloud", cloud)
            .context("binding cloud namespace")?;

        Ok(ScriptHost { lua })
    }

    /// Execute a script to completion. An uncaught script error (which
    /// includes any exception thrown by a cloud module) surfaces here.
    pub fn run(&self, source: &str) -> Result<()> {
        self.lua
            .load(source)
            .exec()
            .context("Script execution failed")
    }

    /// Access to the underlying Lua instance.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}
