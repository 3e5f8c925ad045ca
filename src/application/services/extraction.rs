//! Title extraction service
//!
//! Runs the full pass: region definitions → seed, culture groups → attribute
//! keys, landed titles → resolved regions and attributes, then ordering and
//! grouping by region.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use super::source::SourceLoader;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    culture_keys, group_by_region, resolve, seed_regions, sort_attributes, Attribute,
    AttributeKeys, AttributeTable, RegionMap, TitleFile,
};
use crate::infrastructure::traits::FileSystem;

/// Inputs and policy for one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Landed-title documents or directories
    pub title_paths: Vec<PathBuf>,
    /// Region definition documents or directories
    pub region_paths: Vec<PathBuf>,
    /// Culture group documents or directories
    pub culture_paths: Vec<PathBuf>,
    /// Fixed attribute keys
    pub attribute_keys: Vec<String>,
    pub region_prefix: String,
    pub titular_label: String,
}

impl ExtractionRequest {
    /// Request covering the configured mod layout.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            title_paths: vec![settings.landed_titles_path()],
            region_paths: vec![settings.regions_file()],
            culture_paths: vec![settings.cultures_path()],
            attribute_keys: settings.attribute_keys.clone(),
            region_prefix: settings.region_prefix.clone(),
            titular_label: settings.titular_label.clone(),
        }
    }
}

/// Result of an extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Per-title attributes, sorted for presentation
    pub attributes: AttributeTable,
    /// Completed title → region map
    pub regions: RegionMap,
    /// Keys used, including the discovered cultures
    pub keys: AttributeKeys,
    /// Region label → title codes, in table order
    pub groups: IndexMap<String, Vec<String>>,
}

impl Extraction {
    /// Attributes nested by region label, then title.
    pub fn grouped_attributes(&self) -> IndexMap<&str, IndexMap<&str, &[Attribute]>> {
        self.groups
            .iter()
            .map(|(label, titles)| {
                let entries = titles
                    .iter()
                    .filter_map(|code| {
                        self.attributes
                            .get(code)
                            .map(|attrs| (code.as_str(), attrs))
                    })
                    .collect();
                (label.as_str(), entries)
            })
            .collect()
    }
}

/// Service running extraction passes over pre-parsed mod data.
pub struct ExtractionService {
    loader: SourceLoader,
}

impl ExtractionService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            loader: SourceLoader::new(fs),
        }
    }

    /// Run one extraction pass.
    ///
    /// Region definitions are loaded and validated before any title is
    /// visited; a malformed definition aborts the pass.
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&mut self, request: &ExtractionRequest) -> ApplicationResult<Extraction> {
        let seed = self.load_seed(request)?;

        let culture_files = self.loader.load_all(&request.culture_paths, "culture groups")?;
        let cultures = culture_keys(culture_files.iter().map(Arc::as_ref));
        let keys = AttributeKeys::new(request.attribute_keys.iter().cloned(), cultures);
        debug!(keys = keys.len(), "attribute keys ready");

        let title_files = self.title_files(request)?;
        let (mut attributes, regions) = resolve(title_files.iter().map(Arc::as_ref), seed, &keys);
        sort_attributes(&mut attributes, &keys);
        let groups = group_by_region(&attributes, &regions, &request.titular_label);

        info!(
            titles = attributes.len(),
            groups = groups.len(),
            "extraction complete"
        );
        Ok(Extraction {
            attributes,
            regions,
            keys,
            groups,
        })
    }

    /// Landed-title files of a request, parsed once per service.
    pub fn title_files(&mut self, request: &ExtractionRequest) -> ApplicationResult<Vec<Arc<TitleFile>>> {
        if request.title_paths.is_empty() {
            return Err(ApplicationError::NoInput {
                what: "title files".to_string(),
                path: PathBuf::new(),
            });
        }
        self.loader.load_all(&request.title_paths, "title files")
    }

    pub fn loader(&self) -> &SourceLoader {
        &self.loader
    }

    fn load_seed(&mut self, request: &ExtractionRequest) -> ApplicationResult<RegionMap> {
        if request.region_paths.is_empty() {
            warn!("no region definitions given, every title will be titular");
            return Ok(RegionMap::new());
        }
        let files = self.loader.load_all(&request.region_paths, "region definitions")?;
        let seed = seed_regions(files.iter().map(Arc::as_ref), &request.region_prefix)?;
        Ok(seed)
    }
}
