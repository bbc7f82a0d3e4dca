//! Embedded Lua scripting bridge
//!
//! The marshaling and dispatch layer between the Lua runtime and the API
//! client: coercion of script values into typed request structures,
//! projection of typed records back into script objects, and translation
//! of every failure mode into a script-level exception.

pub mod convert;
pub mod modules;
pub mod runtime;

pub use runtime::ScriptHost;
