//! Orchestration of the tag cascade.
//!
//! This module drives the three-step flow: discover parents carrying the
//! marker tag, resolve each parent's children, and merge the parent's
//! remaining tags onto each child.
//!
//! # Architecture
//!
//! The orchestration core never performs I/O directly: it issues
//! [`crate::effects::TrackingEffect`] values through a
//! [`crate::effects::TrackingInterpreter`], which enables thorough testing
//! with mock interpreters.
//!
//! # Key Invariants
//!
//! 1. **Tags are only added**: a child's final tag set is its original tags
//!    unioned with the parent's tags minus the marker. Nothing is removed.
//! 2. **The marker never cascades**: it is stripped before propagation, so a
//!    child never becomes a cascade source by accident.
//! 3. **Per-item isolation**: one child's failure never stops its siblings;
//!    one parent's child-lookup failure never stops the next parent.

pub mod engine;
pub mod merge;
pub mod query;
pub mod report;


// Re-export commonly used types
pub use engine::{CascadeEngine, CascadeError, MARKER_TAG};
pub use merge::merge_tags;
pub use query::{children_of_wiql, find_children, run_query, tagged_items_wiql, QueryError};
pub use report::{CascadeReport, MergeOutcome, MergeResult, ParentOutcome, ParentResult};
