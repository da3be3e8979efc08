//! Tracking effect interpreter for the Azure DevOps REST API.
//!
//! This module implements the `TrackingInterpreter` trait, executing
//! tracking effects against the real service via the minimal REST client.
//!
//! Key implementation details:
//! - WIQL queries go through the query endpoint and return bare ids
//! - Batch fetches join the requested ids as a comma-separated list
//! - Tag updates are a single JSON Patch "add" operation on the tag field
//! - Retry logic with exponential backoff for transient errors

use serde::{Deserialize, Serialize};

use crate::effects::{TrackingEffect, TrackingInterpreter, TrackingResponse};
use crate::types::{WorkItem, WorkItemId};

use super::client::AzureClient;
use super::error::ApiError;
use super::retry::{retry_with_backoff, RetryConfig, RetryPolicy};

/// JSON Patch path of the tag field.
const TAGS_FIELD_PATH: &str = "/fields/System.Tags";

// ─── Wire Types ───────────────────────────────────────────────────────────────

/// Request body for the query endpoint.
#[derive(Debug, Serialize)]
struct WiqlRequest<'a> {
    query: &'a str,
}

/// Response from the query endpoint: matching item references, id only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResponse {
    #[serde(default)]
    work_items: Vec<WorkItemRef>,
}

#[derive(Debug, Deserialize)]
struct WorkItemRef {
    id: u64,
}

/// Response from the batch-fetch endpoint.
#[derive(Debug, Deserialize)]
struct WorkItemBatch {
    #[serde(default)]
    value: Vec<WorkItem>,
}

/// One JSON Patch operation. The update endpoint takes a list of these.
#[derive(Debug, Serialize)]
struct PatchOp<'a> {
    op: &'static str,
    path: &'static str,
    value: &'a str,
}

// ─── Interpreter Implementation ───────────────────────────────────────────────

impl TrackingInterpreter for AzureClient {
    type Error = ApiError;

    async fn interpret(&self, effect: TrackingEffect) -> Result<TrackingResponse, Self::Error> {
        interpret_tracking_effect(
            self,
            effect,
            RetryConfig::DEFAULT,
            RetryPolicy::RetryTransient,
        )
        .await
    }
}

/// Interprets a tracking effect, executing it against the service.
///
/// This is the main entry point for effect interpretation. It wraps the
/// actual call in retry logic so transient faults are absorbed before the
/// orchestration core sees them.
pub async fn interpret_tracking_effect(
    client: &AzureClient,
    effect: TrackingEffect,
    retry_config: RetryConfig,
    retry_policy: RetryPolicy,
) -> Result<TrackingResponse, ApiError> {
    let result = retry_with_backoff(retry_config, retry_policy, || {
        execute_effect(client, effect.clone())
    })
    .await;

    result.into_result()
}

/// Executes a single effect without retry logic.
async fn execute_effect(
    client: &AzureClient,
    effect: TrackingEffect,
) -> Result<TrackingResponse, ApiError> {
    match effect {
        TrackingEffect::RunQuery { wiql } => run_query(client, &wiql).await,
        TrackingEffect::GetWorkItemsBatch { ids } => get_work_items_batch(client, &ids).await,
        TrackingEffect::GetWorkItem { id } => get_work_item(client, id).await,
        TrackingEffect::UpdateTags { id, tags } => update_tags(client, id, &tags).await,
    }
}

// ─── Operations ───────────────────────────────────────────────────────────────

async fn run_query(client: &AzureClient, wiql: &str) -> Result<TrackingResponse, ApiError> {
    let response: WiqlResponse = client.post("wit/wiql", &WiqlRequest { query: wiql }).await?;
    let ids = response
        .work_items
        .into_iter()
        .map(|item| WorkItemId(item.id))
        .collect();
    Ok(TrackingResponse::Ids(ids))
}

async fn get_work_items_batch(
    client: &AzureClient,
    ids: &[WorkItemId],
) -> Result<TrackingResponse, ApiError> {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let batch: WorkItemBatch = client.get("wit/workitems", &[("ids", joined.as_str())]).await?;
    Ok(TrackingResponse::Items(batch.value))
}

async fn get_work_item(client: &AzureClient, id: WorkItemId) -> Result<TrackingResponse, ApiError> {
    let item: WorkItem = client.get(&format!("wit/workitems/{}", id), &[]).await?;
    Ok(TrackingResponse::Item(item))
}

async fn update_tags(
    client: &AzureClient,
    id: WorkItemId,
    tags: &str,
) -> Result<TrackingResponse, ApiError> {
    // Single "add" operation; for an existing field this is a full replace.
    let ops = [PatchOp {
        op: "add",
        path: TAGS_FIELD_PATH,
        value: tags,
    }];
    client.patch(&format!("wit/workitems/{}", id), &ops).await?;
    Ok(TrackingResponse::Updated)
}
