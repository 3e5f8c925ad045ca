//! Duchy-level region seed from geographic region definitions.
//!
//! A leaf definition looks like
//! `world_europe_west = { duchies = { d_normandy d_brittany } }`.
//! Aggregate definitions (those holding a `regions` entry) are skipped.

use tracing::{debug, instrument};

use crate::domain::entities::{Node, TitleFile, Value};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tables::RegionMap;

pub const DEFAULT_REGION_PREFIX: &str = "world_";

const DUCHIES_KEY: &str = "duchies";
const REGIONS_KEY: &str = "regions";

/// Build the seed map from region definition files, applied in order.
///
/// A duchy listed by several definitions ends up in the last one.
#[instrument(level = "debug", skip(files))]
pub fn seed_regions<'f, I>(files: I, prefix: &str) -> DomainResult<RegionMap>
where
    I: IntoIterator<Item = &'f TitleFile>,
{
    let mut seed = RegionMap::new();
    for file in files {
        for node in &file.nodes {
            apply_definition(&mut seed, node, prefix)?;
        }
    }
    debug!(duchies = seed.len(), "seeded duchy regions");
    Ok(seed)
}

fn apply_definition(seed: &mut RegionMap, node: &Node, prefix: &str) -> DomainResult<()> {
    let Some(region) = node.key.strip_prefix(prefix) else {
        return Ok(());
    };
    let malformed = |reason: &str| DomainError::MalformedRegionDefinition {
        definition: node.key.clone(),
        reason: reason.to_string(),
    };

    let entries: &[Node] = match &node.value {
        Value::Block(entries) => entries,
        _ => return Err(malformed("expected a block")),
    };
    if entries.iter().any(|entry| entry.key == REGIONS_KEY) {
        return Ok(());
    }

    let duchies: &[String] = match entries {
        [only] if only.key == DUCHIES_KEY => match &only.value {
            Value::List(duchies) => duchies.as_slice(),
            Value::Block(nested) if nested.is_empty() => &[][..],
            Value::Block(_) => return Err(malformed("nested structure in duchy list")),
            Value::Scalar(_) => return Err(malformed("expected a duchy list")),
        },
        [] => return Err(malformed("missing duchy list")),
        _ => return Err(malformed("expected a single duchy list")),
    };

    for duchy in duchies {
        seed.insert(duchy.as_str(), Some(region.to_string()));
    }
    Ok(())
}
