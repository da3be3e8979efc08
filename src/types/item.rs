//! Work item data as fetched from the tracking service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::WorkItemId;
use super::tags::TagSet;

/// Field reference names used by this tool.
///
/// The service addresses every field by its full reference name, both in
/// query text and in patch paths.
pub mod fields {
    /// The delimited tag field. The only field this tool ever mutates.
    pub const TAGS: &str = "System.Tags";
    /// The id of the item's structural parent.
    pub const PARENT: &str = "System.Parent";
    /// The item's type (feature, user story, task, ...).
    pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
    /// The item's own id.
    pub const ID: &str = "System.Id";
}

/// A work item snapshot: id, revision, and a field-name → value mapping.
///
/// Fetched fresh per operation; nothing here is cached across steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// The item's identifier.
    pub id: WorkItemId,
    /// The revision the snapshot was taken at.
    pub rev: u64,
    /// Full field data keyed by reference name.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl WorkItem {
    /// Creates a work item with no fields set.
    pub fn new(id: impl Into<WorkItemId>, rev: u64) -> Self {
        WorkItem {
            id: id.into(),
            rev,
            fields: Map::new(),
        }
    }

    /// Sets a field value, builder-style.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Returns the raw tag field value, if the item has one.
    pub fn tag_field(&self) -> Option<&str> {
        self.fields.get(fields::TAGS).and_then(Value::as_str)
    }

    /// Returns the item's tags. An absent or empty tag field parses to the
    /// empty set.
    pub fn tags(&self) -> TagSet {
        TagSet::parse(self.tag_field().unwrap_or(""))
    }

    /// Returns the id of the item's parent, if linked.
    pub fn parent_id(&self) -> Option<WorkItemId> {
        self.fields
            .get(fields::PARENT)
            .and_then(Value::as_u64)
            .map(WorkItemId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_of_item_without_tag_field_is_empty() {
        let item = WorkItem::new(7, 1);
        assert!(item.tags().is_empty());
        assert_eq!(item.tag_field(), None);
    }

    #[test]
    fn tags_parses_the_tag_field() {
        let item = WorkItem::new(100, 3).with_field(fields::TAGS, "CascadeTags; Incident Response");
        assert_eq!(item.tags().join(), "CascadeTags; Incident Response");
    }

    #[test]
    fn parent_id_reads_the_parent_link_field() {
        let item = WorkItem::new(200, 1).with_field(fields::PARENT, 100);
        assert_eq!(item.parent_id(), Some(WorkItemId(100)));
        assert_eq!(WorkItem::new(201, 1).parent_id(), None);
    }

    #[test]
    fn deserializes_from_service_shape() {
        let item: WorkItem = serde_json::from_str(
            r#"{
                "id": 100,
                "rev": 5,
                "fields": {
                    "System.Id": 100,
                    "System.WorkItemType": "Feature",
                    "System.Tags": "CascadeTags; Incident Response"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(item.id, WorkItemId(100));
        assert_eq!(item.rev, 5);
        assert_eq!(item.tags().join(), "CascadeTags; Incident Response");
    }
}
