//! Region resolution over the landed-title hierarchy.
//!
//! Regions flow two ways through one recursive walk:
//! - down: a duchy's seeded region is inherited by its counties and baronies,
//! - up: an empire or kingdom takes the most common region of its direct
//!   children, ties going to the region seen first.

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::domain::attributes::AttributeKeys;
use crate::domain::entities::{Node, Tier, TitleFile};
use crate::domain::tables::{Attribute, AttributeTable, RegionMap};

/// Walks title trees, completing a seeded [`RegionMap`] and collecting the
/// [`AttributeTable`].
pub struct TitleRegionResolver<'k> {
    keys: &'k AttributeKeys,
    regions: RegionMap,
    attributes: AttributeTable,
}

impl<'k> TitleRegionResolver<'k> {
    /// Start from the duchy-level seed; it must be complete before walking.
    pub fn new(seed: RegionMap, keys: &'k AttributeKeys) -> Self {
        Self {
            keys,
            regions: seed,
            attributes: AttributeTable::new(),
        }
    }

    /// Walk one source file. Files share the tables; later definitions win.
    #[instrument(level = "debug", skip_all, fields(file = %file.name))]
    pub fn walk_file(&mut self, file: &TitleFile) {
        self.walk(&file.nodes, None);
    }

    pub fn finish(self) -> (AttributeTable, RegionMap) {
        (self.attributes, self.regions)
    }

    /// Visit every title among `nodes`, returning the region each one yields.
    fn walk(&mut self, nodes: &[Node], inherited: Option<&str>) -> Vec<Option<String>> {
        nodes
            .iter()
            .filter_map(|node| Tier::of(&node.key).map(|tier| (node, tier)))
            .map(|(node, tier)| self.visit(node, tier, inherited))
            .collect()
    }

    fn visit(&mut self, node: &Node, tier: Tier, inherited: Option<&str>) -> Option<String> {
        let code = node.key.as_str();
        let attributes = self.collect_attributes(node);
        self.attributes.insert(code, attributes);

        if tier.inherits_region() {
            self.regions.insert(code, inherited.map(str::to_owned));
        }

        if tier.passes_region_down() {
            // An entry for the title itself, even a titular one, beats the liege's region.
            let region = match self.regions.lookup(code) {
                Some(own) => own.map(str::to_owned),
                None => inherited.map(str::to_owned),
            };
            self.walk(node.children(), region.as_deref());
        }

        if tier.votes_for_region() {
            let yielded = self.walk(node.children(), None);
            match majority(yielded.iter().flatten().map(String::as_str)) {
                Some(winner) => {
                    trace!(code, region = winner, "majority region");
                    self.regions.insert(code, Some(winner.to_owned()));
                }
                None => trace!(code, "no child region, left unresolved"),
            }
        }

        self.regions.get(code).map(str::to_owned)
    }

    fn collect_attributes(&self, node: &Node) -> Vec<Attribute> {
        node.children()
            .iter()
            .filter(|child| self.keys.contains(&child.key))
            .map(|child| Attribute::new(child.key.as_str(), child.value.to_text()))
            .collect()
    }
}

/// Resolve regions and collect attributes over all `files`, in order.
///
/// `seed` holds the duchy-level regions from the region definitions.
#[instrument(level = "debug", skip_all)]
pub fn resolve<'f, I>(files: I, seed: RegionMap, keys: &AttributeKeys) -> (AttributeTable, RegionMap)
where
    I: IntoIterator<Item = &'f TitleFile>,
{
    let mut resolver = TitleRegionResolver::new(seed, keys);
    for file in files {
        resolver.walk_file(file);
    }
    let (attributes, regions) = resolver.finish();
    debug!(
        titles = attributes.len(),
        regions = regions.len(),
        "resolved title regions"
    );
    (attributes, regions)
}

/// Most frequent region, ties broken by first occurrence.
pub fn majority<'a, I>(regions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    // Insertion order of the counter is first-occurrence order.
    let mut counts: IndexMap<&'a str, usize> = IndexMap::new();
    for region in regions {
        *counts.entry(region).or_insert(0) += 1;
    }

    let mut winner: Option<(&'a str, usize)> = None;
    for (region, count) in counts {
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((region, count));
        }
    }
    winner.map(|(region, _)| region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["north", "north", "south"], Some("north"))]
    #[case(&["south", "north", "north"], Some("north"))]
    #[case(&["north", "south"], Some("north"))]
    #[case(&["south", "north"], Some("south"))]
    #[case(&["a", "b", "b", "a", "c"], Some("a"))]
    #[case(&[], None)]
    fn given_regions_when_voting_then_picks_mode_with_first_seen_tie_break(
        #[case] regions: &[&str],
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(majority(regions.iter().copied()), expected);
    }

    #[test]
    fn given_barony_under_county_when_walking_then_inherits_county_region() {
        let keys = AttributeKeys::default();
        let mut seed = RegionMap::new();
        seed.insert("d_test", Some("north".to_string()));
        let file = TitleFile::new(
            "t",
            vec![Node::block(
                "d_test",
                vec![Node::block("c_test", vec![Node::block("b_test", vec![])])],
            )],
        );

        let (_, regions) = resolve([&file], seed, &keys);

        assert_eq!(regions.get("b_test"), Some("north"));
    }
}
