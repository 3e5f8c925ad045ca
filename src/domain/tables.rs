//! Resolution outputs: title regions and per-title attributes

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

/// Title code to region.
///
/// A code may be present with no region: the title is known to be titular.
/// `lookup` keeps that distinction, `get` flattens it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionMap {
    entries: BTreeMap<String, Option<String>>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region of `code`, replacing any earlier entry.
    pub fn insert(&mut self, code: impl Into<String>, region: Option<String>) {
        self.entries.insert(code.into(), region);
    }

    /// Region of `code`, `None` if unknown or titular.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).and_then(|r| r.as_deref())
    }

    /// `None` if `code` has no entry, `Some(None)` if it is explicitly titular.
    pub fn lookup(&self, code: &str) -> Option<Option<&str>> {
        self.entries.get(code).map(|r| r.as_deref())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(code, region)| (code.as_str(), region.as_deref()))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for RegionMap {
    fn from_iter<T: IntoIterator<Item = (K, Option<String>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (code, region) in iter {
            map.insert(code, region);
        }
        map
    }
}

/// One extracted `key = value` pair of a title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Title code to its attributes, in traversal order.
///
/// Re-inserting a title keeps its original position and replaces its pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeTable {
    titles: IndexMap<String, Vec<Attribute>>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, attributes: Vec<Attribute>) {
        self.titles.insert(code.into(), attributes);
    }

    pub fn get(&self, code: &str) -> Option<&[Attribute]> {
        self.titles.get(code).map(Vec::as_slice)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.titles.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Title codes in traversal order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Attribute])> {
        self.titles
            .iter()
            .map(|(code, attrs)| (code.as_str(), attrs.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<Attribute>)> {
        self.titles
            .iter_mut()
            .map(|(code, attrs)| (code.as_str(), attrs))
    }
}
