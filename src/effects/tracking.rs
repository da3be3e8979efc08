//! Tracking-service effect types.
//!
//! These types describe tracking-service operations as data, without
//! executing them. The interpreter in the `azure` module executes them
//! against the real service.

use serde::{Deserialize, Serialize};

use crate::types::{WorkItem, WorkItemId};

/// A tracking-service effect.
///
/// Each variant describes one service operation. Effects are project-scoped:
/// the interpreter is constructed with an organization and project, so
/// effects don't include them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEffect {
    /// Run a structured query, returning the ids of matching items.
    RunQuery {
        /// The query text (WIQL).
        wiql: String,
    },

    /// Fetch full field data for a batch of items in one call.
    GetWorkItemsBatch { ids: Vec<WorkItemId> },

    /// Fetch full field data for a single item.
    GetWorkItem { id: WorkItemId },

    /// Overwrite an item's tag field with a new full value.
    ///
    /// This is a full-field replace at the protocol level (one "add" patch
    /// operation on the tag field path), so `tags` must carry the complete
    /// serialized tag string, not just the additions.
    UpdateTags { id: WorkItemId, tags: String },
}

/// Response from a tracking-service effect.
///
/// Each variant corresponds to the response of a particular effect type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TrackingResponse {
    /// Response to `RunQuery`: matching ids in service order. May be empty;
    /// callers treat that as a normal terminal case, not a fault.
    Ids(Vec<WorkItemId>),

    /// Response to `GetWorkItemsBatch`: one item per requested id, in the
    /// order the service returned them.
    Items(Vec<WorkItem>),

    /// Response to `GetWorkItem`.
    Item(WorkItem),

    /// Response to `UpdateTags`.
    Updated,
}
