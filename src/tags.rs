// Tag codec module: the remote store keeps a file's tags as one
// comma-separated string under the `"tags"` property key. This module
// converts between that encoding and an ordered, de-duplicated tag list.

use std::collections::HashMap;

/// Property key under which the encoded tag list is stored remotely.
pub const TAGS_PROPERTY: &str = "tags";

/// Decoded form of the `"tags"` property value.
///
/// Invariants: every entry is non-empty and whitespace-trimmed, entries are
/// unique, and first-seen order is preserved. Encoding is `join(",")`, so
/// `decode(encode(s)) == s` holds for any set whose tags contain no comma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<String>,
}

impl TagSet {
    /// Parse the raw property value. Splits on `,`, trims each segment,
    /// drops empty segments and collapses duplicates.
    pub fn decode(raw: &str) -> Self {
        let mut set = TagSet::default();
        for segment in raw.split(',') {
            set.insert(segment);
        }
        set
    }

    /// Decode the `"tags"` entry of a property bag; empty set when absent.
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        properties
            .get(TAGS_PROPERTY)
            .map(|raw| Self::decode(raw))
            .unwrap_or_default()
    }

    /// Re-encode for storage. The empty set encodes to the empty string.
    pub fn encode(&self) -> String {
        self.entries.join(",")
    }

    /// Exact-string, case-sensitive membership test against the trimmed
    /// input.
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.entries.iter().any(|t| t == tag)
    }

    /// Append a tag. Returns `false` without mutating when the trimmed tag
    /// is already present or is empty.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.entries.push(tag.to_string());
        true
    }

    /// Remove a tag. Returns `false` when it was not present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        match self.entries.iter().position(|t| t == tag) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tags in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
