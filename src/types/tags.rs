//! Ordered tag collections with a defined wire serialization.
//!
//! The tracking service stores all of an item's tags in a single delimited
//! string field. `TagSet` is the typed view of that field: an ordered,
//! case-sensitively deduplicated collection that parses from and serializes
//! to the delimited form. Order is preserved through a round-trip so that
//! writing a set back never produces an incidental diff.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when serializing a tag set back to the tag field.
///
/// The service accepts `";"` and `"; "` interchangeably on write and emits
/// `"; "` on read; parsing splits on the bare `';'` and trims.
pub const TAG_SEPARATOR: &str = "; ";

/// An ordered set of tag names.
///
/// Insertion order is preserved; duplicates (case-sensitive) are dropped on
/// insert. The empty set is the parse of an empty or absent tag field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        TagSet { tags: Vec::new() }
    }

    /// Parses a delimited tag field value.
    ///
    /// Splits on `';'`, trims surrounding whitespace from each part, drops
    /// empty parts, and deduplicates while keeping the first occurrence.
    pub fn parse(raw: &str) -> Self {
        let mut set = TagSet::new();
        for part in raw.split(';') {
            let tag = part.trim();
            if !tag.is_empty() {
                set.insert(tag);
            }
        }
        set
    }

    /// Appends a tag if it is not already present.
    ///
    /// Returns true if the tag was added.
    pub fn insert(&mut self, tag: &str) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Returns true if the set contains `tag` (case-sensitive).
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns a copy of this set with `tag` removed.
    ///
    /// The relative order of the remaining tags is unchanged.
    pub fn without(&self, tag: &str) -> TagSet {
        TagSet {
            tags: self.tags.iter().filter(|t| *t != tag).cloned().collect(),
        }
    }

    /// Returns the union of this set and `other`.
    ///
    /// Tags from `self` come first in their original order, followed by the
    /// tags of `other` that are not already present. Unioning the same set
    /// twice therefore changes nothing.
    pub fn union(&self, other: &TagSet) -> TagSet {
        let mut merged = self.clone();
        for tag in other.iter() {
            merged.insert(tag);
        }
        merged
    }

    /// Returns true if the set holds no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns the number of tags in the set.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Serializes the set to the delimited wire form.
    pub fn join(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }
}

// Display and the serde impls all go through `join`/`parse` so there is a
// single definition of the wire form.
impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join())
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.join())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TagSet::parse(&raw))
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_splits_trims_and_drops_empties() {
        let set = TagSet::parse(" Research ;Blocked;  ; Incident Response");
        let tags: Vec<_> = set.iter().collect();
        assert_eq!(tags, vec!["Research", "Blocked", "Incident Response"]);
    }

    #[test]
    fn parse_deduplicates_keeping_first_occurrence() {
        let set = TagSet::parse("A; B; A; C; B");
        let tags: Vec<_> = set.iter().collect();
        assert_eq!(tags, vec!["A", "B", "C"]);
    }

    #[test]
    fn parse_of_empty_string_is_empty() {
        assert!(TagSet::parse("").is_empty());
        assert!(TagSet::parse(" ; ; ").is_empty());
    }

    #[test]
    fn join_uses_semicolon_space() {
        let set = TagSet::parse("Research;Blocked");
        assert_eq!(set.join(), "Research; Blocked");
    }

    #[test]
    fn without_removes_only_the_named_tag() {
        let set = TagSet::parse("CascadeTags; Incident Response");
        let remaining = set.without("CascadeTags");
        assert_eq!(remaining.join(), "Incident Response");
        // Absent tag is a no-op
        assert_eq!(remaining.without("CascadeTags"), remaining);
    }

    #[test]
    fn without_is_case_sensitive() {
        let set = TagSet::parse("cascadetags; Other");
        assert_eq!(set.without("CascadeTags").len(), 2);
    }

    #[test]
    fn union_appends_only_missing_tags() {
        let existing = TagSet::parse("Research; Blocked");
        let incoming = TagSet::parse("Blocked; Incident Response");
        let merged = existing.union(&incoming);
        assert_eq!(merged.join(), "Research; Blocked; Incident Response");
    }

    #[test]
    fn union_with_subset_is_identity() {
        let existing = TagSet::parse("Research; Blocked; Incident Response");
        let incoming = TagSet::parse("Incident Response");
        assert_eq!(existing.union(&incoming), existing);
    }

    #[test]
    fn serde_uses_the_wire_form() {
        let set = TagSet::parse("A; B");
        assert_eq!(serde_json::to_string(&set).unwrap(), "\"A; B\"");
        let parsed: TagSet = serde_json::from_str("\"A;B\"").unwrap();
        assert_eq!(parsed, set);
    }

    fn arb_tag() -> impl Strategy<Value = String> {
        // No separators and no edge whitespace, so parse(join(..)) is lossless.
        "[A-Za-z][A-Za-z0-9]{0,11}"
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_order(tags in prop::collection::vec(arb_tag(), 0..8)) {
            let set: TagSet = tags.iter().map(String::as_str).collect();
            let reparsed = TagSet::parse(&set.join());
            prop_assert_eq!(reparsed, set);
        }

        #[test]
        fn union_is_idempotent(
            a in prop::collection::vec(arb_tag(), 0..8),
            b in prop::collection::vec(arb_tag(), 0..8),
        ) {
            let a: TagSet = a.iter().map(String::as_str).collect();
            let b: TagSet = b.iter().map(String::as_str).collect();
            let once = a.union(&b);
            prop_assert_eq!(once.union(&b), once);
        }

        #[test]
        fn union_contains_both_sides(
            a in prop::collection::vec(arb_tag(), 0..8),
            b in prop::collection::vec(arb_tag(), 0..8),
        ) {
            let a: TagSet = a.iter().map(String::as_str).collect();
            let b: TagSet = b.iter().map(String::as_str).collect();
            let merged = a.union(&b);
            for tag in a.iter().chain(b.iter()) {
                prop_assert!(merged.contains(tag));
            }
        }
    }
}
