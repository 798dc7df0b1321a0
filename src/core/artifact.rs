use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Creation time of a backup artifact. Providers hand timestamps over as
/// RFC 3339 strings; a value that fails to parse is carried verbatim and
/// displayed as-is instead of failing the scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackupTimestamp {
    Utc(OffsetDateTime),
    Raw(String),
}

impl BackupTimestamp {
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        match OffsetDateTime::parse(&value, &Rfc3339) {
            Ok(t) => BackupTimestamp::Utc(t.to_offset(time::UtcOffset::UTC)),
            Err(_) => BackupTimestamp::Raw(value),
        }
    }

    /// Sort/compare key. `None` for unparseable values, which order after
    /// every parseable one.
    pub fn as_utc(&self) -> Option<OffsetDateTime> {
        match self {
            BackupTimestamp::Utc(t) => Some(*t),
            BackupTimestamp::Raw(_) => None,
        }
    }

    pub fn display(&self) -> String {
        const DISPLAY: &[time::format_description::BorrowedFormatItem<'static>] =
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
        match self {
            BackupTimestamp::Utc(t) => t
                .format(&DISPLAY)
                .unwrap_or_else(|_| t.to_string()),
            BackupTimestamp::Raw(s) => s.clone(),
        }
    }
}

impl From<String> for BackupTimestamp {
    fn from(value: String) -> Self {
        BackupTimestamp::parse(value)
    }
}

impl From<BackupTimestamp> for String {
    fn from(value: BackupTimestamp) -> Self {
        match value {
            BackupTimestamp::Utc(t) => t.format(&Rfc3339).unwrap_or_else(|_| t.to_string()),
            BackupTimestamp::Raw(s) => s,
        }
    }
}

/// One discrete recoverable point-in-time copy (snapshot, machine image,
/// recovery point) associated with a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupArtifact {
    pub id: String,
    pub resource_id: String,
    pub created_at: BackupTimestamp,
    /// Origin of the artifact: vault name for recovery points, otherwise
    /// the snapshot/image family (`rds`, `ami`).
    pub source_label: String,
}

impl BackupArtifact {
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        created_at: BackupTimestamp,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            created_at,
            source_label: source_label.into(),
        }
    }
}
