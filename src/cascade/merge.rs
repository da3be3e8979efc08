//! Per-child tag merging.
//!
//! A merge is a fetch-then-patch pair: read the child's current tag field,
//! union in the propagated tags, and write the full merged value back. The
//! two calls are issued strictly in sequence for one child, and a failure at
//! either step is captured in the outcome rather than propagated, so one
//! child's failure never touches its siblings.

use std::fmt;

use crate::effects::{TrackingEffect, TrackingInterpreter, TrackingResponse};
use crate::types::{TagSet, WorkItemId};

use super::report::{MergeOutcome, MergeResult};

/// Merges `tags` onto the work item `child`.
///
/// The child is fetched fresh - the snapshot a query returned earlier may be
/// stale by the time its turn comes. The union keeps the child's existing
/// tags first, in their original order, and appends only the propagated tags
/// not already present; if that adds nothing, no write is issued and the
/// outcome is `Unchanged`. Callers guarantee `tags` is non-empty.
pub async fn merge_tags<I>(tracking: &I, child: WorkItemId, tags: &TagSet) -> MergeOutcome
where
    I: TrackingInterpreter,
    I::Error: fmt::Display,
{
    MergeOutcome {
        child,
        result: merge_tags_inner(tracking, child, tags).await,
    }
}

async fn merge_tags_inner<I>(tracking: &I, child: WorkItemId, tags: &TagSet) -> MergeResult
where
    I: TrackingInterpreter,
    I::Error: fmt::Display,
{
    let response = match tracking.interpret(TrackingEffect::GetWorkItem { id: child }).await {
        Ok(response) => response,
        Err(e) => {
            return MergeResult::Failed {
                message: format!("fetching current tags failed: {}", e),
            }
        }
    };

    let item = match response {
        TrackingResponse::Item(item) => item,
        other => {
            return MergeResult::Failed {
                message: format!("unexpected response to GetWorkItem: {:?}", other),
            }
        }
    };

    let existing = item.tags();
    let merged = existing.union(tags);
    if merged == existing {
        return MergeResult::Unchanged;
    }

    let update = TrackingEffect::UpdateTags {
        id: child,
        tags: merged.join(),
    };
    match tracking.interpret(update).await {
        Ok(TrackingResponse::Updated) => MergeResult::Updated { tags: merged },
        Ok(other) => MergeResult::Failed {
            message: format!("unexpected response to UpdateTags: {:?}", other),
        },
        Err(e) => MergeResult::Failed {
            message: format!("updating tags failed: {}", e),
        },
    }
}
