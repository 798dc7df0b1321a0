use crate::audit::AuditContext;
use crate::core::{BackupArtifact, ManagedResource, ResourceKind};
use crate::providers::{CloudProvider, Result};

/// Candidate backup artifacts for one resource, per-kind strategy. A hard
/// failure here becomes a `DiscoveryError` for this resource only.
pub fn discover(
    ctx: &AuditContext,
    provider: &dyn CloudProvider,
    resource: &ManagedResource,
) -> Result<Vec<BackupArtifact>> {
    let mut artifacts = match resource.kind {
        ResourceKind::DatabaseCluster => provider.list_snapshots(&resource.id)?,
        ResourceKind::ComputeInstance => recent_images(ctx, provider, resource)?,
        ResourceKind::FileSystem => vault_recovery_points(ctx, provider, resource)?,
    };

    for artifact in &mut artifacts {
        artifact.resource_id = resource.id.clone();
    }
    Ok(artifacts)
}

/// Compute images are matched by the naming convention embedding the
/// instance id, then cut off at the recency window: only images created
/// within the window qualify (inclusive at the cutoff instant), older ones
/// are discarded entirely. An image whose timestamp cannot be parsed
/// cannot prove recency and does not qualify.
fn recent_images(
    ctx: &AuditContext,
    provider: &dyn CloudProvider,
    resource: &ManagedResource,
) -> Result<Vec<BackupArtifact>> {
    let pattern = format!("*{}*", resource.id);
    let images = provider.list_images(&pattern)?;

    let cutoff = ctx.now - ctx.recency_window;
    Ok(images
        .into_iter()
        .filter(|img| matches!(img.created_at.as_utc(), Some(t) if t >= cutoff))
        .collect())
}

/// A file system's recovery points may live in more than one vault, so
/// every vault is scanned and the results accumulated. One bad vault must
/// not hide backups present in another: per-vault failures are logged and
/// skipped.
fn vault_recovery_points(
    ctx: &AuditContext,
    provider: &dyn CloudProvider,
    resource: &ManagedResource,
) -> Result<Vec<BackupArtifact>> {
    let account = provider.account_id()?;
    let arn = format!(
        "arn:aws:elasticfilesystem:{}:{}:file-system/{}",
        ctx.region, account, resource.id
    );

    let mut points = Vec::new();
    for vault in provider.list_vaults()? {
        match provider.list_recovery_points(&vault, &arn) {
            Ok(batch) => points.extend(batch),
            Err(err) => {
                log::warn!("skipping vault {vault} for {}: {err}", resource.id);
            }
        }
    }
    Ok(points)
}
