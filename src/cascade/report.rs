//! Outcome types for a cascade run.
//!
//! The engine records what happened to every marked parent and every child
//! it touched; the binary turns the report into log lines and an exit code.

use serde::{Deserialize, Serialize};

use crate::types::{TagSet, WorkItemId};

/// The outcome of one full cascade run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// One entry per parent that carried the marker tag, in processing order.
    pub parents: Vec<ParentOutcome>,
}

impl CascadeReport {
    /// Number of children whose tag field was updated.
    pub fn merged_count(&self) -> usize {
        self.merge_results()
            .filter(|r| matches!(r, MergeResult::Updated { .. }))
            .count()
    }

    /// Number of children already carrying every propagated tag.
    pub fn unchanged_count(&self) -> usize {
        self.merge_results()
            .filter(|r| matches!(r, MergeResult::Unchanged))
            .count()
    }

    /// Number of per-child merge failures.
    pub fn failed_count(&self) -> usize {
        self.merge_results()
            .filter(|r| matches!(r, MergeResult::Failed { .. }))
            .count()
    }

    /// True if any child merge failed or any parent's child lookup failed.
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
            || self
                .parents
                .iter()
                .any(|p| matches!(p.result, ParentResult::ChildLookupFailed { .. }))
    }

    fn merge_results(&self) -> impl Iterator<Item = &MergeResult> {
        self.parents.iter().flat_map(|p| p.merges()).map(|m| &m.result)
    }
}

/// What happened for one marked parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentOutcome {
    /// The parent's id.
    pub parent: WorkItemId,

    /// The tag set that was (or would have been) propagated: the parent's
    /// tags minus the marker.
    pub propagated: TagSet,

    /// How processing of this parent ended.
    pub result: ParentResult,
}

impl ParentOutcome {
    /// The per-child outcomes, empty unless the parent was processed.
    pub fn merges(&self) -> &[MergeOutcome] {
        match &self.result {
            ParentResult::Processed { merges } => merges,
            _ => &[],
        }
    }
}

/// Terminal state of one parent's processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ParentResult {
    /// The parent carried only the marker; its children were never looked up.
    NothingToPropagate,

    /// Resolving the parent's children failed; the run continued with the
    /// next parent.
    ChildLookupFailed { message: String },

    /// Children were resolved and each received a merge attempt.
    Processed { merges: Vec<MergeOutcome> },
}

/// The outcome of one child's tag merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// The child's id.
    pub child: WorkItemId,

    /// How the merge ended.
    pub result: MergeResult,
}

/// Terminal state of one child's tag merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MergeResult {
    /// The tag field was written with the merged value.
    Updated {
        /// The full tag set after the merge.
        tags: TagSet,
    },

    /// Every propagated tag was already present; no write was issued.
    Unchanged,

    /// The fetch-then-patch sequence failed. Siblings are unaffected.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagSet;

    fn sample_report() -> CascadeReport {
        CascadeReport {
            parents: vec![
                ParentOutcome {
                    parent: WorkItemId(100),
                    propagated: TagSet::parse("Incident Response"),
                    result: ParentResult::Processed {
                        merges: vec![
                            MergeOutcome {
                                child: WorkItemId(200),
                                result: MergeResult::Updated {
                                    tags: TagSet::parse("Research; Incident Response"),
                                },
                            },
                            MergeOutcome {
                                child: WorkItemId(201),
                                result: MergeResult::Unchanged,
                            },
                            MergeOutcome {
                                child: WorkItemId(202),
                                result: MergeResult::Failed {
                                    message: "service error (HTTP 503)".to_string(),
                                },
                            },
                        ],
                    },
                },
                ParentOutcome {
                    parent: WorkItemId(101),
                    propagated: TagSet::new(),
                    result: ParentResult::NothingToPropagate,
                },
            ],
        }
    }

    #[test]
    fn counters_tally_per_child_results() {
        let report = sample_report();
        assert_eq!(report.merged_count(), 1);
        assert_eq!(report.unchanged_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn child_lookup_failure_counts_as_failure() {
        let report = CascadeReport {
            parents: vec![ParentOutcome {
                parent: WorkItemId(100),
                propagated: TagSet::parse("A"),
                result: ParentResult::ChildLookupFailed {
                    message: "query failed".to_string(),
                },
            }],
        };
        assert_eq!(report.failed_count(), 0);
        assert!(report.has_failures());
    }

    #[test]
    fn empty_report_is_clean() {
        let report = CascadeReport::default();
        assert!(!report.has_failures());
        assert_eq!(report.merged_count(), 0);
    }
}
