use std::collections::HashMap;

use bkaudit::core::{
    BackupArtifact, BackupTimestamp, ManagedResource, ResourceKind, SectionBody,
};
use bkaudit::engine::{Engine, EngineOptions};
use bkaudit::providers::{CloudProvider, ProviderError, ResourcePage, VaultId};

/// File systems plus a set of vaults; recovery points are keyed by the
/// constructed file-system ARN, and whole vaults can be marked as failing.
#[derive(Default)]
struct VaultFleet {
    file_systems: Vec<ManagedResource>,
    /// Recovery points per vault, keyed by resource ARN.
    vaults: Vec<(String, HashMap<String, Vec<BackupArtifact>>)>,
    failing_vaults: Vec<String>,
}

impl VaultFleet {
    fn file_system(mut self, id: &str) -> Self {
        self.file_systems
            .push(ManagedResource::new(id, ResourceKind::FileSystem));
        self
    }

    fn vault(mut self, name: &str) -> Self {
        self.vaults.push((name.to_string(), HashMap::new()));
        self
    }

    fn recovery_point(mut self, vault: &str, fs_id: &str, rp_id: &str, created_at: &str) -> Self {
        let arn = format!(
            "arn:aws:elasticfilesystem:us-east-1:123456789012:file-system/{fs_id}"
        );
        let entry = self
            .vaults
            .iter_mut()
            .find(|(name, _)| name == vault)
            .expect("vault registered")
            .1
            .entry(arn)
            .or_default();
        entry.push(BackupArtifact::new(
            rp_id,
            "",
            BackupTimestamp::parse(created_at),
            vault,
        ));
        self
    }
}

impl CloudProvider for VaultFleet {
    fn account_id(&self) -> Result<String, ProviderError> {
        Ok("123456789012".to_string())
    }

    fn list_resources(
        &self,
        kind: ResourceKind,
        _page_token: Option<&str>,
    ) -> Result<ResourcePage, ProviderError> {
        let resources = if kind == ResourceKind::FileSystem {
            self.file_systems.clone()
        } else {
            Vec::new()
        };
        Ok(ResourcePage {
            resources,
            next_token: None,
        })
    }

    fn list_snapshots(&self, _resource_id: &str) -> Result<Vec<BackupArtifact>, ProviderError> {
        Ok(Vec::new())
    }

    fn list_images(&self, _name_pattern: &str) -> Result<Vec<BackupArtifact>, ProviderError> {
        Ok(Vec::new())
    }

    fn list_vaults(&self) -> Result<Vec<VaultId>, ProviderError> {
        Ok(self
            .vaults
            .iter()
            .map(|(name, _)| VaultId(name.clone()))
            .collect())
    }

    fn list_recovery_points(
        &self,
        vault: &VaultId,
        resource_arn: &str,
    ) -> Result<Vec<BackupArtifact>, ProviderError> {
        if self.failing_vaults.iter().any(|name| *name == vault.0) {
            return Err(ProviderError::Denied(format!(
                "ListRecoveryPointsByBackupVault on {vault}"
            )));
        }
        let (_, points) = self
            .vaults
            .iter()
            .find(|(name, _)| *name == vault.0)
            .ok_or_else(|| ProviderError::Other(format!("unknown vault: {vault}")))?;
        Ok(points.get(resource_arn).cloned().unwrap_or_default())
    }
}

fn filesystem_engine() -> Engine {
    Engine::new(EngineOptions {
        region: "us-east-1".to_string(),
        exclude_tokens: Vec::new(),
        top_n: 5,
        recency_window_days: 42,
        kinds: vec![ResourceKind::FileSystem],
        show_progress: false,
    })
}

fn table_rows(body: &SectionBody) -> &[Vec<String>] {
    match body {
        SectionBody::Table { rows } => rows,
        SectionBody::Banner { .. } => panic!("expected a table, got a banner"),
    }
}

#[test]
fn recovery_points_from_two_vaults_merge_before_top_n() {
    // Scenario: 2 points in vault-a, 3 in vault-b, distinct timestamps.
    let provider = VaultFleet::default()
        .file_system("fs-1")
        .vault("vault-a")
        .vault("vault-b")
        .recovery_point("vault-a", "fs-1", "rp-2", "2026-01-02T00:00:00Z")
        .recovery_point("vault-a", "fs-1", "rp-4", "2026-01-04T00:00:00Z")
        .recovery_point("vault-b", "fs-1", "rp-1", "2026-01-01T00:00:00Z")
        .recovery_point("vault-b", "fs-1", "rp-5", "2026-01-05T00:00:00Z")
        .recovery_point("vault-b", "fs-1", "rp-3", "2026-01-03T00:00:00Z");

    let report = filesystem_engine().run(&provider);
    let rows = table_rows(&report.sections[0].body);

    let ids: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(ids, ["rp-5", "rp-4", "rp-3", "rp-2", "rp-1"]);

    // Vault scoping survives the merge via the source column.
    let sources: Vec<&str> = rows.iter().map(|r| r[3].as_str()).collect();
    assert_eq!(sources, ["vault-b", "vault-a", "vault-b", "vault-a", "vault-b"]);
}

#[test]
fn more_than_top_n_merged_points_are_capped() {
    let mut provider = VaultFleet::default()
        .file_system("fs-1")
        .vault("vault-a")
        .vault("vault-b");
    for day in 1..=4 {
        provider = provider.recovery_point(
            "vault-a",
            "fs-1",
            &format!("rp-a{day}"),
            &format!("2026-01-0{day}T00:00:00Z"),
        );
    }
    for day in 5..=8 {
        provider = provider.recovery_point(
            "vault-b",
            "fs-1",
            &format!("rp-b{day}"),
            &format!("2026-01-0{day}T00:00:00Z"),
        );
    }

    let report = filesystem_engine().run(&provider);
    let rows = table_rows(&report.sections[0].body);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][1], "rp-b8");
    assert_eq!(rows[4][1], "rp-a4");
}

#[test]
fn one_failing_vault_does_not_hide_backups_in_another() {
    let mut provider = VaultFleet::default()
        .file_system("fs-1")
        .vault("vault-bad")
        .vault("vault-good")
        .recovery_point("vault-good", "fs-1", "rp-1", "2026-01-01T00:00:00Z");
    provider.failing_vaults.push("vault-bad".to_string());

    let report = filesystem_engine().run(&provider);
    let rows = table_rows(&report.sections[0].body);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "rp-1");
    assert_eq!(report.summary.covered, 1);
    assert_eq!(report.summary.discovery_errors, 0);
}

#[test]
fn points_for_other_file_systems_are_not_picked_up() {
    let provider = VaultFleet::default()
        .file_system("fs-1")
        .file_system("fs-2")
        .vault("vault-a")
        .recovery_point("vault-a", "fs-2", "rp-1", "2026-01-01T00:00:00Z");

    let report = filesystem_engine().run(&provider);
    let rows = table_rows(&report.sections[0].body);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["fs-1", "No backups configured", "-", "-"]);
    assert_eq!(rows[1][0], "fs-2");
    assert_eq!(rows[1][1], "rp-1");
}
