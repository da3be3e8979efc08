//! The cascade orchestrator.
//!
//! One run is a single sequential pass: find parents carrying the marker
//! tag, compute each parent's propagatable tag set, resolve its children,
//! and merge the set onto each child. No state survives a run.
//!
//! Failure semantics:
//! - Parent discovery failing aborts the run.
//! - One parent's child lookup failing is recorded and the run continues
//!   with the next parent.
//! - One child's merge failing is recorded and its siblings still get their
//!   merge attempt.

use std::fmt;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::effects::TrackingInterpreter;

use super::merge::merge_tags;
use super::query::{find_children, run_query, tagged_items_wiql, QueryError};
use super::report::{CascadeReport, MergeResult, ParentOutcome, ParentResult};

/// The reserved tag that flags a work item as a cascade source.
///
/// It is stripped from the propagated set and never itself cascaded.
pub const MARKER_TAG: &str = "CascadeTags";

/// Errors that abort a cascade run.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// Discovering the marked parents failed; nothing was processed.
    #[error("discovering tagged parents failed: {0}")]
    ParentDiscovery(#[from] QueryError),
}

/// The cascade orchestrator.
///
/// Stateless apart from the marker tag it scans for; every run is
/// independent, and because merging deduplicates, re-running against an
/// unchanged project is a no-op.
#[derive(Debug, Clone)]
pub struct CascadeEngine {
    marker: String,
}

impl Default for CascadeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CascadeEngine {
    /// Creates an engine scanning for the standard marker tag.
    pub fn new() -> Self {
        Self::with_marker(MARKER_TAG)
    }

    /// Creates an engine scanning for a custom marker tag.
    pub fn with_marker(marker: impl Into<String>) -> Self {
        CascadeEngine {
            marker: marker.into(),
        }
    }

    /// The marker tag this engine scans for.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Runs one cascade pass.
    ///
    /// # Errors
    ///
    /// Only parent discovery failures abort the run; every later fault is
    /// isolated and recorded in the returned [`CascadeReport`].
    pub async fn run<I>(&self, tracking: &I) -> Result<CascadeReport, CascadeError>
    where
        I: TrackingInterpreter,
        I::Error: fmt::Display,
    {
        let parents = run_query(tracking, &tagged_items_wiql(&self.marker)).await?;

        if parents.is_empty() {
            info!(marker = %self.marker, "no work items carry the marker tag; nothing to do");
            return Ok(CascadeReport::default());
        }
        info!(count = parents.len(), marker = %self.marker, "found tagged parent work items");

        let mut report = CascadeReport::default();
        for parent in parents {
            let propagated = parent.tags().without(&self.marker);

            if propagated.is_empty() {
                info!(parent = %parent.id, "parent has no tags to cascade beyond the marker");
                report.parents.push(ParentOutcome {
                    parent: parent.id,
                    propagated,
                    result: ParentResult::NothingToPropagate,
                });
                continue;
            }

            let children = match find_children(tracking, parent.id).await {
                Ok(children) => children,
                Err(e) => {
                    warn!(parent = %parent.id, error = %e, "child lookup failed; skipping this parent");
                    report.parents.push(ParentOutcome {
                        parent: parent.id,
                        propagated,
                        result: ParentResult::ChildLookupFailed {
                            message: e.to_string(),
                        },
                    });
                    continue;
                }
            };

            if children.is_empty() {
                info!(parent = %parent.id, "parent has no child work items");
            }

            let mut merges = Vec::with_capacity(children.len());
            for child in &children {
                let outcome = merge_tags(tracking, child.id, &propagated).await;
                match &outcome.result {
                    MergeResult::Updated { tags } => {
                        info!(child = %outcome.child, tags = %tags, "tags updated");
                    }
                    MergeResult::Unchanged => {
                        info!(child = %outcome.child, "already has every cascaded tag");
                    }
                    MergeResult::Failed { message } => {
                        error!(child = %outcome.child, error = %message, "tag update failed");
                    }
                }
                merges.push(outcome);
            }

            report.parents.push(ParentOutcome {
                parent: parent.id,
                propagated,
                result: ParentResult::Processed { merges },
            });
        }

        Ok(report)
    }
}
