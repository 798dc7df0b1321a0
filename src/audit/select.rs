use crate::core::BackupArtifact;

/// Most recent `top_n` artifacts, descending by creation time. The sort is
/// stable: ties keep the provider's relative order, and artifacts with
/// unparseable timestamps order after all parseable ones.
pub fn top_recent(mut artifacts: Vec<BackupArtifact>, top_n: usize) -> Vec<BackupArtifact> {
    artifacts.sort_by_key(|a| std::cmp::Reverse(a.created_at.as_utc()));
    artifacts.truncate(top_n);
    artifacts
}
