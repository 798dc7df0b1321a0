use crate::core::{BackupArtifact, CoverageResult, ManagedResource, ResourceKind};
use crate::providers::ProviderError;

/// Canonical "no backup" token. Every kind sentinel contains it, and
/// `is_no_backup_label` is the only sentinel test: row highlighting and
/// section banner collapse must agree on this rule.
pub const NO_BACKUP_TOKEN: &str = "no backup";

pub const fn sentinel_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::DatabaseCluster | ResourceKind::FileSystem => "No backups configured",
        ResourceKind::ComputeInstance => "No backup AMIs (DLM) configured",
    }
}

pub fn is_no_backup_label(label: &str) -> bool {
    label.to_ascii_lowercase().contains(NO_BACKUP_TOKEN)
}

/// Successful discovery: covered iff anything qualified, otherwise the
/// kind-specific sentinel.
pub fn classify(resource: &ManagedResource, selected: Vec<BackupArtifact>) -> CoverageResult {
    if selected.is_empty() {
        CoverageResult::not_covered(&resource.id, sentinel_label(resource.kind))
    } else {
        CoverageResult::covered(&resource.id, selected)
    }
}

/// Failed discovery for one resource; siblings are unaffected.
pub fn discovery_error(resource: &ManagedResource, err: &ProviderError) -> CoverageResult {
    CoverageResult::discovery_error(&resource.id, err.to_string())
}
