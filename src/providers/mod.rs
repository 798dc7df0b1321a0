use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{BackupArtifact, ManagedResource, ResourceKind};

mod snapshot_file;

pub use snapshot_file::SnapshotFileProvider;

pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("access denied: {0}")]
    Denied(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultId(pub String);

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of inventory results. `next_token` is opaque to the caller;
/// `None` means the listing is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub resources: Vec<ManagedResource>,
    pub next_token: Option<String>,
}

/// Narrow interface to the authenticated cloud session. Every call is
/// blocking; none are retried by the engine.
pub trait CloudProvider {
    fn account_id(&self) -> Result<String>;

    fn list_resources(&self, kind: ResourceKind, page_token: Option<&str>)
    -> Result<ResourcePage>;

    /// Snapshot catalog lookup by owning resource id (database kind).
    fn list_snapshots(&self, resource_id: &str) -> Result<Vec<BackupArtifact>>;

    /// Machine-image catalog lookup by name pattern, `*` as wildcard
    /// (compute kind).
    fn list_images(&self, name_pattern: &str) -> Result<Vec<BackupArtifact>>;

    fn list_vaults(&self) -> Result<Vec<VaultId>>;

    /// Recovery points in one vault whose resource reference matches the
    /// given ARN (file-system kind).
    fn list_recovery_points(
        &self,
        vault: &VaultId,
        resource_arn: &str,
    ) -> Result<Vec<BackupArtifact>>;
}
