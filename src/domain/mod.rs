//! Domain layer: title trees, region resolution and attribute tables
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attributes;
pub mod cultures;
pub mod entities;
pub mod error;
pub mod resolver;
pub mod seed;
pub mod tables;

pub use attributes::{group_by_region, sort_attributes, AttributeKeys};
pub use cultures::culture_keys;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use resolver::{majority, resolve, TitleRegionResolver};
pub use seed::{seed_regions, DEFAULT_REGION_PREFIX};
pub use tables::{Attribute, AttributeTable, RegionMap};
