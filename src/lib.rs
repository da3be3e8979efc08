//! Tag cascade for Azure DevOps work items.
//!
//! A parent work item tagged with the marker `CascadeTags` has its remaining
//! tags merged onto every directly linked child item. This library provides
//! the domain types, the orchestration core, and the REST interpreter that
//! executes it against the service.

pub mod azure;
pub mod cascade;
pub mod config;
pub mod effects;
pub mod types;
