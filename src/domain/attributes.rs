//! Attribute keys, attribute ordering and grouping of titles by region

use indexmap::{IndexMap, IndexSet};

use crate::domain::tables::{Attribute, AttributeTable, RegionMap};

/// Keys recorded per title: fixed landed-title keys plus culture names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeKeys {
    fixed: IndexSet<String>,
    cultures: IndexSet<String>,
}

impl AttributeKeys {
    pub fn new<F, C>(fixed: F, cultures: C) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            fixed: fixed.into_iter().map(Into::into).collect(),
            cultures: cultures.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fixed.contains(key) || self.cultures.contains(key)
    }

    pub fn is_fixed(&self, key: &str) -> bool {
        self.fixed.contains(key)
    }

    pub fn is_culture(&self, key: &str) -> bool {
        self.cultures.contains(key)
    }

    pub fn fixed(&self) -> impl Iterator<Item = &str> {
        self.fixed.iter().map(String::as_str)
    }

    pub fn cultures(&self) -> impl Iterator<Item = &str> {
        self.cultures.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fixed.union(&self.cultures).count()
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.cultures.is_empty()
    }
}

/// Sort every title's pairs for presentation.
///
/// Order key is `(is_culture, is_fixed, key, value)`: localisation pairs first,
/// then fixed landed-title keys, culture names last.
pub fn sort_attributes(table: &mut AttributeTable, keys: &AttributeKeys) {
    for (_, attributes) in table.iter_mut() {
        attributes.sort_by(|a, b| sort_key(a, keys).cmp(&sort_key(b, keys)));
    }
}

fn sort_key<'a>(attribute: &'a Attribute, keys: &AttributeKeys) -> (bool, bool, &'a str, &'a str) {
    (
        keys.is_culture(&attribute.key),
        keys.is_fixed(&attribute.key),
        attribute.key.as_str(),
        attribute.value.as_str(),
    )
}

/// Group title codes by resolved region, in table order.
///
/// Regions appear in order of their first title. Titles without a region go
/// under `titular_label`.
pub fn group_by_region(
    table: &AttributeTable,
    regions: &RegionMap,
    titular_label: &str,
) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for code in table.titles() {
        let label = regions.get(code).unwrap_or(titular_label);
        groups
            .entry(label.to_string())
            .or_default()
            .push(code.to_string());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_overlapping_sets_when_counting_then_keys_are_not_double_counted() {
        let keys = AttributeKeys::new(["title", "greek"], ["greek", "norse"]);
        assert_eq!(keys.len(), 3);
        assert!(keys.is_fixed("greek"));
        assert!(keys.is_culture("greek"));
        assert!(!keys.contains("foa"));
    }
}
