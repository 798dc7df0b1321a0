use crate::core::BackupArtifact;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Covered,
    NotCovered,
    DiscoveryError,
}

/// Classification of one non-excluded resource. Invariants: `Covered` iff
/// `artifacts` is non-empty; `DiscoveryError` iff the discovery call for the
/// resource failed (`artifacts` empty, `error_detail` set); `NotCovered` iff
/// discovery succeeded with zero qualifying artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub resource_id: String,
    pub status: CoverageStatus,
    pub artifacts: Vec<BackupArtifact>,
    /// Row text for non-covered resources: the kind sentinel, or
    /// `Error: <message>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl CoverageResult {
    pub fn covered(resource_id: impl Into<String>, artifacts: Vec<BackupArtifact>) -> Self {
        debug_assert!(!artifacts.is_empty());
        Self {
            resource_id: resource_id.into(),
            status: CoverageStatus::Covered,
            artifacts,
            label: None,
            error_detail: None,
        }
    }

    pub fn not_covered(resource_id: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            status: CoverageStatus::NotCovered,
            artifacts: Vec::new(),
            label: Some(sentinel.into()),
            error_detail: None,
        }
    }

    pub fn discovery_error(resource_id: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            resource_id: resource_id.into(),
            status: CoverageStatus::DiscoveryError,
            artifacts: Vec::new(),
            label: Some(format!("Error: {message}")),
            error_detail: Some(message),
        }
    }

    pub fn is_covered(&self) -> bool {
        self.status == CoverageStatus::Covered
    }
}
