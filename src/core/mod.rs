mod artifact;
mod coverage;
mod resource;
mod section;

pub use artifact::{BackupArtifact, BackupTimestamp};
pub use coverage::{CoverageResult, CoverageStatus};
pub use resource::{ManagedResource, ResourceKind, Tag};
pub use section::{Report, ReportSummary, Section, SectionBody};
