use std::time::Duration as StdDuration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::audit::{self, AuditContext, AuditError, KindAudit, classify};
use crate::core::{CoverageStatus, Report, ReportSummary, ResourceKind, Section, SectionBody};
use crate::providers::CloudProvider;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub region: String,
    pub exclude_tokens: Vec<String>,
    pub top_n: usize,
    pub recency_window_days: u32,
    /// Kinds to audit, in order. Order carries no correctness dependency.
    pub kinds: Vec<ResourceKind>,
    pub show_progress: bool,
}

#[derive(Clone)]
pub struct Engine {
    opts: EngineOptions,
}

impl Engine {
    pub fn new(opts: EngineOptions) -> Self {
        Self { opts }
    }

    /// Full scan: kinds strictly in sequence, each resource strictly in
    /// sequence within its kind. Always runs to completion; enumeration
    /// failures surface as per-kind banners.
    pub fn run(&self, provider: &dyn CloudProvider) -> Report {
        self.run_at(provider, OffsetDateTime::now_utc())
    }

    pub fn run_at(&self, provider: &dyn CloudProvider, now: OffsetDateTime) -> Report {
        let ctx = AuditContext {
            region: self.opts.region.clone(),
            exclude_tokens: self.opts.exclude_tokens.clone(),
            top_n: self.opts.top_n,
            recency_window: time::Duration::days(i64::from(self.opts.recency_window_days)),
            now,
        };

        use std::io::IsTerminal;
        let progress_enabled = self.opts.show_progress && std::io::stderr().is_terminal();

        let mut sections = Vec::new();
        let mut notes = vec![format!(
            "audit: region={} top_n={} recency_window_days={}",
            self.opts.region, self.opts.top_n, self.opts.recency_window_days
        )];
        let mut tally = Tally::default();

        for &kind in &self.opts.kinds {
            let pb = if progress_enabled {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                pb.set_message(format!("Auditing {}...", kind.plural()));
                pb.enable_steady_tick(StdDuration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let outcome = audit::audit_kind(&ctx, provider, kind);

            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            match outcome {
                Ok(audit) => {
                    tally.add(&audit);
                    if audit.excluded > 0 {
                        notes.push(format!(
                            "filter: excluded {} {} by tag",
                            audit.excluded,
                            kind.plural()
                        ));
                    }
                    sections.push(section_from_results(&audit));
                }
                Err(err @ AuditError::Enumeration { .. }) => {
                    notes.push(format!("enumeration: {err}"));
                    sections.push(banner_section(kind, format!("Could not enumerate {kind}.")));
                }
            }
        }

        let generated_at = now
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        notes.sort();
        notes.dedup();

        Report {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            region: self.opts.region.clone(),
            generated_at,
            summary: ReportSummary {
                resources_audited: tally.audited,
                covered: tally.covered,
                not_covered: tally.not_covered,
                discovery_errors: tally.errors,
                notes,
            },
            sections,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    audited: u64,
    covered: u64,
    not_covered: u64,
    errors: u64,
}

impl Tally {
    fn add(&mut self, audit: &KindAudit) {
        for result in &audit.results {
            self.audited += 1;
            match result.status {
                CoverageStatus::Covered => self.covered += 1,
                CoverageStatus::NotCovered => self.not_covered += 1,
                CoverageStatus::DiscoveryError => self.errors += 1,
            }
        }
    }
}

/// A section collapses to a banner iff it has no results at all, or every
/// result carries the "no backup" sentinel. Error rows keep the table.
fn section_from_results(audit: &KindAudit) -> Section {
    let kind = audit.kind;
    let all_sentinel = audit.results.iter().all(|r| {
        r.status == CoverageStatus::NotCovered
            && r.label.as_deref().is_some_and(classify::is_no_backup_label)
    });

    if audit.results.is_empty() || all_sentinel {
        return banner_section(
            kind,
            format!("No backups configured for {}.", kind.service()),
        );
    }

    let mut rows = Vec::new();
    for result in &audit.results {
        if result.is_covered() {
            // One row per (resource, artifact) pair.
            for artifact in &result.artifacts {
                rows.push(vec![
                    result.resource_id.clone(),
                    artifact.id.clone(),
                    artifact.created_at.display(),
                    artifact.source_label.clone(),
                ]);
            }
        } else {
            rows.push(vec![
                result.resource_id.clone(),
                result.label.clone().unwrap_or_default(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
    }

    Section {
        kind,
        title: kind.section_title().to_string(),
        header: section_header(kind),
        body: SectionBody::Table { rows },
    }
}

fn banner_section(kind: ResourceKind, text: String) -> Section {
    Section {
        kind,
        title: kind.section_title().to_string(),
        header: section_header(kind),
        body: SectionBody::Banner { text },
    }
}

fn section_header(kind: ResourceKind) -> Vec<String> {
    vec![
        kind.id_header().to_string(),
        kind.backup_header().to_string(),
        "Created On".to_string(),
        "Source".to_string(),
    ]
}
