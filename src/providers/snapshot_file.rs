use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{BackupArtifact, BackupTimestamp, ManagedResource, ResourceKind, Tag};
use crate::providers::{CloudProvider, ProviderError, ResourcePage, VaultId};

const DEFAULT_PAGE_SIZE: usize = 100;

/// Offline data source: an exported account snapshot, as produced by the
/// inventory export job. Lets an audit run against a point-in-time copy of
/// the account without an authenticated session.
#[derive(Debug)]
pub struct SnapshotFileProvider {
    snapshot: AccountSnapshot,
}

#[derive(Debug, Deserialize)]
struct AccountSnapshot {
    account_id: String,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default)]
    database_clusters: Vec<RawResource>,
    #[serde(default)]
    compute_instances: Vec<RawResource>,
    #[serde(default)]
    file_systems: Vec<RawResource>,
    /// Snapshot catalog keyed by owning cluster id.
    #[serde(default)]
    snapshots: HashMap<String, Vec<RawSnapshot>>,
    #[serde(default)]
    images: Vec<RawImage>,
    #[serde(default)]
    vaults: Vec<RawVault>,
}

#[derive(Debug, Deserialize)]
struct RawResource {
    id: String,
    #[serde(default)]
    tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    id: String,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    id: String,
    name: String,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct RawVault {
    name: String,
    /// Recovery points keyed by the resource ARN they reference.
    #[serde(default)]
    recovery_points: HashMap<String, Vec<RawRecoveryPoint>>,
}

#[derive(Debug, Deserialize)]
struct RawRecoveryPoint {
    arn: String,
    created_at: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl SnapshotFileProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read account snapshot: {}", path.display()))?;
        let snapshot: AccountSnapshot = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse account snapshot: {}", path.display()))?;
        Ok(Self { snapshot })
    }

    fn resources_of(&self, kind: ResourceKind) -> &[RawResource] {
        match kind {
            ResourceKind::DatabaseCluster => &self.snapshot.database_clusters,
            ResourceKind::ComputeInstance => &self.snapshot.compute_instances,
            ResourceKind::FileSystem => &self.snapshot.file_systems,
        }
    }
}

impl CloudProvider for SnapshotFileProvider {
    fn account_id(&self) -> super::Result<String> {
        Ok(self.snapshot.account_id.clone())
    }

    fn list_resources(
        &self,
        kind: ResourceKind,
        page_token: Option<&str>,
    ) -> super::Result<ResourcePage> {
        let all = self.resources_of(kind);
        let start = match page_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ProviderError::Other(format!("invalid page token: {token}")))?,
        };

        let page_size = self.snapshot.page_size.max(1);
        let end = start.saturating_add(page_size).min(all.len());
        let resources = all[start.min(all.len())..end]
            .iter()
            .map(|raw| ManagedResource {
                id: raw.id.clone(),
                kind,
                tags: raw
                    .tags
                    .iter()
                    .map(|t| Tag::new(t.key.clone(), t.value.clone()))
                    .collect(),
            })
            .collect();

        Ok(ResourcePage {
            resources,
            next_token: (end < all.len()).then(|| end.to_string()),
        })
    }

    fn list_snapshots(&self, resource_id: &str) -> super::Result<Vec<BackupArtifact>> {
        let snapshots = self
            .snapshot
            .snapshots
            .get(resource_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(snapshots
            .iter()
            .map(|s| {
                BackupArtifact::new(
                    s.id.clone(),
                    resource_id,
                    BackupTimestamp::parse(s.created_at.clone()),
                    "rds",
                )
            })
            .collect())
    }

    fn list_images(&self, name_pattern: &str) -> super::Result<Vec<BackupArtifact>> {
        Ok(self
            .snapshot
            .images
            .iter()
            .filter(|img| wildcard_match(name_pattern, &img.name))
            .map(|img| {
                BackupArtifact::new(
                    img.id.clone(),
                    "",
                    BackupTimestamp::parse(img.created_at.clone()),
                    "ami",
                )
            })
            .collect())
    }

    fn list_vaults(&self) -> super::Result<Vec<VaultId>> {
        Ok(self
            .snapshot
            .vaults
            .iter()
            .map(|v| VaultId(v.name.clone()))
            .collect())
    }

    fn list_recovery_points(
        &self,
        vault: &VaultId,
        resource_arn: &str,
    ) -> super::Result<Vec<BackupArtifact>> {
        let vault = self
            .snapshot
            .vaults
            .iter()
            .find(|v| v.name == vault.0)
            .ok_or_else(|| ProviderError::Other(format!("unknown vault: {vault}")))?;

        let points = vault
            .recovery_points
            .get(resource_arn)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(points
            .iter()
            .map(|rp| {
                BackupArtifact::new(
                    recovery_point_id(&rp.arn),
                    "",
                    BackupTimestamp::parse(rp.created_at.clone()),
                    vault.name.clone(),
                )
            })
            .collect())
    }
}

/// Short recovery-point id: the last `:`-separated segment of the ARN.
fn recovery_point_id(arn: &str) -> String {
    arn.rsplit(':').next().unwrap_or(arn).to_string()
}

/// Minimal `*`-wildcard match over image names. The engine only ever asks
/// for `*<id>*`, but anchored segments are honored too.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    let last = segments.len() - 1;
    let mut rest = name;

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            // No leading '*': the first segment is anchored.
            let Some(stripped) = rest.strip_prefix(segment) else {
                return false;
            };
            rest = stripped;
            if i == last {
                return rest.is_empty();
            }
        } else if i == last && !pattern.ends_with('*') {
            return rest.ends_with(segment);
        } else {
            let Some(idx) = rest.find(segment) else {
                return false;
            };
            rest = &rest[idx + segment.len()..];
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_match_is_substring_for_doubly_starred_patterns() {
        assert!(wildcard_match("*i-0abc*", "backup-i-0abc-2026-03-01"));
        assert!(wildcard_match("*i-0abc*", "i-0abc"));
        assert!(!wildcard_match("*i-0abc*", "backup-i-0xyz-2026-03-01"));
    }

    #[test]
    fn wildcard_match_honors_anchors() {
        assert!(wildcard_match("backup-*", "backup-i-0abc"));
        assert!(!wildcard_match("backup-*", "old-backup-i-0abc"));
        assert!(wildcard_match("*-2026", "backup-i-0abc-2026"));
        assert!(!wildcard_match("*-2026", "backup-i-0abc-2025"));
        assert!(wildcard_match("i-0abc", "i-0abc"));
        assert!(!wildcard_match("i-0abc", "i-0abcd"));
    }

    #[test]
    fn wildcard_segments_must_appear_in_order() {
        assert!(wildcard_match("*backup*i-0abc*", "my-backup-of-i-0abc"));
        assert!(!wildcard_match("*backup*i-0abc*", "i-0abc-backup"));
    }

    #[test]
    fn recovery_point_id_takes_last_arn_segment() {
        assert_eq!(
            recovery_point_id("arn:aws:backup:us-east-1:123456789012:recovery-point:rp-1"),
            "rp-1"
        );
        assert_eq!(recovery_point_id("rp-bare"), "rp-bare");
    }
}
