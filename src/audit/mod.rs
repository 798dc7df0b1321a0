use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::{CoverageResult, ManagedResource, ResourceKind};
use crate::providers::{CloudProvider, ProviderError};

pub mod classify;
pub mod discovery;
pub mod filter;
pub mod select;

/// Explicit audit configuration, passed in at call time. No module-level
/// defaults.
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub region: String,
    pub exclude_tokens: Vec<String>,
    pub top_n: usize,
    /// Maximum artifact age for the compute kind; other kinds have no
    /// recency cutoff.
    pub recency_window: Duration,
    pub now: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("could not enumerate {kind}: {source}")]
    Enumeration {
        kind: ResourceKind,
        source: ProviderError,
    },
}

/// Coverage results for one kind, in inventory order, plus the number of
/// resources dropped by the tag exclusion filter.
#[derive(Debug, Clone)]
pub struct KindAudit {
    pub kind: ResourceKind,
    pub results: Vec<CoverageResult>,
    pub excluded: u64,
}

/// Inventory, filter, discovery, selection, and classification for one
/// resource kind, strictly in sequence. Only an enumeration failure is
/// fatal to the kind; per-resource discovery failures become error rows.
pub fn audit_kind(
    ctx: &AuditContext,
    provider: &dyn CloudProvider,
    kind: ResourceKind,
) -> Result<KindAudit, AuditError> {
    let resources =
        enumerate(provider, kind).map_err(|source| AuditError::Enumeration { kind, source })?;

    let mut results = Vec::new();
    let mut excluded: u64 = 0;
    for resource in &resources {
        if filter::is_excluded(&resource.tags, &ctx.exclude_tokens) {
            excluded += 1;
            continue;
        }
        results.push(audit_resource(ctx, provider, resource));
    }

    Ok(KindAudit {
        kind,
        results,
        excluded,
    })
}

fn audit_resource(
    ctx: &AuditContext,
    provider: &dyn CloudProvider,
    resource: &ManagedResource,
) -> CoverageResult {
    match discovery::discover(ctx, provider, resource) {
        Ok(artifacts) => classify::classify(resource, select::top_recent(artifacts, ctx.top_n)),
        Err(err) => classify::discovery_error(resource, &err),
    }
}

/// Exhausts inventory pagination before any filtering begins.
fn enumerate(
    provider: &dyn CloudProvider,
    kind: ResourceKind,
) -> Result<Vec<ManagedResource>, ProviderError> {
    let mut all = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = provider.list_resources(kind, token.as_deref())?;
        all.extend(page.resources);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(all)
}
