//! Core domain types for the tag cascade.
//!
//! This module contains the fundamental types used throughout the
//! application: work item identifiers, work item snapshots, and the ordered
//! tag collections whose serialization the rest of the tool depends on.

pub mod ids;
pub mod item;
pub mod tags;

// Re-export commonly used types at the module level
pub use ids::WorkItemId;
pub use item::{fields, WorkItem};
pub use tags::{TagSet, TAG_SEPARATOR};
