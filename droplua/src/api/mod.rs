//! DigitalOcean v2 API client module
//!
//! The scripting bridge consumes the per-family service traits defined
//! here; `CloudClient` is the production implementation. Keeping the
//! traits as the seam lets the bridge be exercised against stub services
//! that record how they were called.

pub mod client;
pub mod error;
pub mod models;

pub use client::{CloudClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use models::{
    Action, Droplet, DropletCreateRequest, Image, ImageRef, Kernel, ListOptions, Network,
    Networks, Page, Region, Size, SshKeyRef,
};

use async_trait::async_trait;

/// Typed CRUD/list surface for the droplets resource family.
#[async_trait]
pub trait DropletsService: Send + Sync {
    /// Fetch a single droplet by id.
    async fn get(&self, id: i64) -> Result<Droplet, ApiError>;
    /// Fetch one page of droplets plus the more-pages indicator.
    async fn list(&self, opts: &ListOptions) -> Result<Page<Droplet>, ApiError>;
    /// Create a droplet and return the created record.
    async fn create(&self, request: &DropletCreateRequest) -> Result<Droplet, ApiError>;
    /// Destroy a droplet by id.
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// Typed surface for the actions (audit event) resource family.
#[async_trait]
pub trait ActionsService: Send + Sync {
    /// Fetch a single action by id.
    async fn get(&self, id: i64) -> Result<Action, ApiError>;
    /// Fetch one page of actions plus the more-pages indicator.
    async fn list(&self, opts: &ListOptions) -> Result<Page<Action>, ApiError>;
}
