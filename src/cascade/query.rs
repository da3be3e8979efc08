//! Work item queries: WIQL construction and the two-step fetch.
//!
//! The query endpoint returns ids only, so fetching matching items is a
//! two-step affair: run the query, then batch-fetch full field data for
//! exactly the returned ids. An empty id list short-circuits - no batch
//! call is made and the empty result is a normal, non-error outcome.

use std::fmt;

use thiserror::Error;

use crate::effects::{TrackingEffect, TrackingInterpreter, TrackingResponse};
use crate::types::{fields, WorkItem, WorkItemId};

/// Errors from running a query against the tracking service.
///
/// Interpreter errors are captured as messages: whether a given failure is
/// fatal or skippable is the caller's decision, and the callers only ever
/// report the text.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query call itself failed.
    #[error("query failed: {0}")]
    Query(String),

    /// The follow-up batch fetch for the matched ids failed.
    #[error("fetching {count} matched work items failed: {message}")]
    Fetch { count: usize, message: String },

    /// The interpreter answered with a response of the wrong shape.
    #[error("unexpected response to {0}")]
    UnexpectedResponse(&'static str),
}

/// Builds the query selecting items whose tag field contains `marker`.
///
/// Contains-matching is substring-level at the service, which is fine here:
/// the orchestrator re-checks the parsed tag set before propagating.
pub fn tagged_items_wiql(marker: &str) -> String {
    format!(
        "SELECT [{}] FROM WorkItems WHERE [{}] CONTAINS '{}'",
        fields::ID,
        fields::TAGS,
        escape_wiql_literal(marker)
    )
}

/// Builds the query selecting items whose parent link equals `parent`.
pub fn children_of_wiql(parent: WorkItemId) -> String {
    format!(
        "SELECT [{}] FROM WorkItems WHERE [{}] <> '' AND [{}] = {}",
        fields::ID,
        fields::WORK_ITEM_TYPE,
        fields::PARENT,
        parent
    )
}

/// Escapes a string literal for inclusion in WIQL: quotes are doubled.
fn escape_wiql_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Runs a query and returns the matching work items with full field data.
///
/// Step one submits the WIQL and collects matching ids; step two fetches
/// those ids in a single batch call, preserving the order the service
/// returns. Zero matches yields `Ok(vec![])` without a second call.
pub async fn run_query<I>(tracking: &I, wiql: &str) -> Result<Vec<WorkItem>, QueryError>
where
    I: TrackingInterpreter,
    I::Error: fmt::Display,
{
    let response = tracking
        .interpret(TrackingEffect::RunQuery {
            wiql: wiql.to_string(),
        })
        .await
        .map_err(|e| QueryError::Query(e.to_string()))?;

    let ids = match response {
        TrackingResponse::Ids(ids) => ids,
        _ => return Err(QueryError::UnexpectedResponse("RunQuery")),
    };

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let count = ids.len();
    let response = tracking
        .interpret(TrackingEffect::GetWorkItemsBatch { ids })
        .await
        .map_err(|e| QueryError::Fetch {
            count,
            message: e.to_string(),
        })?;

    match response {
        TrackingResponse::Items(items) => Ok(items),
        _ => Err(QueryError::UnexpectedResponse("GetWorkItemsBatch")),
    }
}

/// Returns the items directly linked to `parent` through the parent field.
///
/// Zero children is a valid outcome and yields an empty vector.
pub async fn find_children<I>(tracking: &I, parent: WorkItemId) -> Result<Vec<WorkItem>, QueryError>
where
    I: TrackingInterpreter,
    I::Error: fmt::Display,
{
    run_query(tracking, &children_of_wiql(parent)).await
}
