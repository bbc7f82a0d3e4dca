//! Native resource records for the DigitalOcean v2 API
//!
//! These are immutable snapshots of provider state at fetch time. The
//! scripting bridge never mutates a record after construction; it only
//! projects records into Lua tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A droplet (virtual machine) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droplet {
    /// Numeric droplet identifier
    pub id: i64,
    /// Human-readable droplet name
    pub name: String,
    /// Memory in megabytes
    #[serde(default)]
    pub memory: i64,
    /// Number of virtual CPUs
    #[serde(default)]
    pub vcpus: i64,
    /// Disk size in gigabytes
    #[serde(default)]
    pub disk: i64,
    /// Region the droplet is deployed in
    pub region: Region,
    /// Base image the droplet was created from
    pub image: Image,
    /// Full size descriptor
    pub size: Size,
    /// Size identifier (e.g. "s-1vcpu-1gb")
    #[serde(default)]
    pub size_slug: String,
    /// Identifiers of backups taken of this droplet
    #[serde(default)]
    pub backup_ids: Vec<i64>,
    /// Identifiers of snapshots taken of this droplet
    #[serde(default)]
    pub snapshot_ids: Vec<i64>,
    /// Whether the droplet is locked against events
    #[serde(default)]
    pub locked: bool,
    /// Lifecycle status ("new", "active", "off", "archive")
    #[serde(default)]
    pub status: String,
    /// Attached network interfaces
    #[serde(default)]
    pub networks: Networks,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Running kernel, if the image exposes one
    #[serde(default)]
    pub kernel: Option<Kernel>,
}

/// A datacenter region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier (e.g. "nyc3")
    pub slug: String,
    /// Display name (e.g. "New York 3")
    #[serde(default)]
    pub name: String,
    /// Size slugs available in this region
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Whether new droplets can be created here
    #[serde(default)]
    pub available: bool,
    /// Feature flags (e.g. "backups", "ipv6")
    #[serde(default)]
    pub features: Vec<String>,
}

/// A base image (distribution, snapshot, or backup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Numeric image identifier
    pub id: i64,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Distribution family (e.g. "Ubuntu")
    #[serde(default)]
    pub distribution: String,
    /// Stable slug for public images (e.g. "ubuntu-24-04-x64")
    #[serde(default)]
    pub slug: Option<String>,
    /// Whether the image is publicly available
    #[serde(default)]
    pub public: bool,
    /// Regions the image is available in
    #[serde(default)]
    pub regions: Vec<String>,
}

/// A droplet size descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Size identifier (e.g. "s-1vcpu-1gb")
    pub slug: String,
    /// Memory in megabytes
    #[serde(default)]
    pub memory: i64,
    /// Number of virtual CPUs
    #[serde(default)]
    pub vcpus: i64,
    /// Disk size in gigabytes
    #[serde(default)]
    pub disk: i64,
    /// Monthly transfer allowance in terabytes
    #[serde(default)]
    pub transfer: f64,
    /// Monthly price in USD
    #[serde(default)]
    pub price_monthly: f64,
    /// Hourly price in USD
    #[serde(default)]
    pub price_hourly: f64,
    /// Whether the size can currently be provisioned
    #[serde(default)]
    pub available: bool,
}

/// Network interfaces attached to a droplet, keyed by IP version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<Network>,
    #[serde(default)]
    pub v6: Vec<Network>,
}

/// A single network interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub ip_address: String,
    #[serde(default)]
    pub netmask: String,
    #[serde(default)]
    pub gateway: String,
    /// "public" or "private"
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A kernel exposed by a droplet's image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// An action (audit) record: one provider-side event against a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Numeric action identifier
    pub id: i64,
    /// Lifecycle status ("in-progress", "completed", "errored")
    #[serde(default)]
    pub status: String,
    /// Event type (e.g. "create", "reboot")
    #[serde(rename = "type", default)]
    pub kind: String,
    /// When the action started
    pub started_at: DateTime<Utc>,
    /// When the action finished; absent while in progress
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Identifier of the resource the action applies to
    #[serde(default)]
    pub resource_id: i64,
    /// Resource family of the target (e.g. "droplet")
    #[serde(default)]
    pub resource_type: String,
    /// Region the action ran in; absent for region-less actions
    #[serde(default)]
    pub region_slug: Option<String>,
}

/// Request body for creating a droplet, assembled field-by-field from a
/// script object. Built once per call and discarded after the API call
/// returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: ImageRef,
    pub ssh_keys: Vec<SshKeyRef>,
    pub backups: bool,
    pub ipv6: bool,
    pub private_networking: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_data: String,
}

/// Reference to an image by numeric id or by slug. Serializes to the bare
/// id when set, otherwise to the bare slug, matching the provider's
/// create-droplet wire format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRef {
    pub id: i64,
    pub slug: String,
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.id != 0 {
            serializer.serialize_i64(self.id)
        } else {
            serializer.serialize_str(&self.slug)
        }
    }
}

/// Reference to an SSH key by numeric id or by fingerprint. Serializes to
/// whichever identifier is set, id taking precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SshKeyRef {
    pub id: i64,
    pub fingerprint: String,
}

impl Serialize for SshKeyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.id != 0 {
            serializer.serialize_i64(self.id)
        } else {
            serializer.serialize_str(&self.fingerprint)
        }
    }
}

/// Page selector for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page index
    pub page: u32,
    /// Records per page
    pub per_page: u32,
}

/// One page of records plus the provider's "more pages exist" signal.
///
/// `has_more` is derived from the response's link metadata; its absence
/// terminates pagination even if the page was full.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}
