//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of identifier kinds and make the
//! code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The numeric identifier of a work item in the tracking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(pub u64);

impl WorkItemId {
    /// Returns the raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for WorkItemId {
    fn from(n: u64) -> Self {
        WorkItemId(n)
    }
}
