use crate::core::ResourceKind;
use serde::{Deserialize, Serialize};

/// Renderer handoff for one resource kind: a header plus ordered rows of
/// strings, or a single banner line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "body")]
pub enum SectionBody {
    #[serde(rename = "TABLE")]
    Table { rows: Vec<Vec<String>> },
    #[serde(rename = "BANNER")]
    Banner { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: ResourceKind,
    pub title: String,
    pub header: Vec<String>,
    #[serde(flatten)]
    pub body: SectionBody,
}

impl Section {
    pub fn is_banner(&self) -> bool {
        matches!(self.body, SectionBody::Banner { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub resources_audited: u64,
    pub covered: u64,
    pub not_covered: u64,
    pub discovery_errors: u64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool_version: String,
    pub region: String,
    pub generated_at: String,
    pub summary: ReportSummary,
    pub sections: Vec<Section>,
}
