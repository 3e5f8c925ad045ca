//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/titloc/titloc.toml`
//! 3. Local config: `<mod_dir>/.titloc.toml`
//! 4. Environment variables: `TITLOC_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_REGION_PREFIX;

/// Landed-title keys extracted for every title.
pub const DEFAULT_ATTRIBUTE_KEYS: &[&str] = &[
    "title",
    "title_female",
    "foa",
    "title_prefix",
    "short_name",
    "name_tier",
    "location_ruler_title",
    "dynasty_title_names",
    "male_names",
];

/// Raw settings for intermediate parsing (`None` means "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub mod_dir: Option<PathBuf>,
    pub landed_titles_dir: Option<PathBuf>,
    pub regions_path: Option<PathBuf>,
    pub cultures_dir: Option<PathBuf>,
    pub region_prefix: Option<String>,
    pub titular_label: Option<String>,
    pub attribute_keys: Option<Vec<String>>,
}

/// Unified configuration for titloc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the mod checkout (default: current directory)
    pub mod_dir: PathBuf,
    /// Landed-title documents, relative to `mod_dir`
    pub landed_titles_dir: PathBuf,
    /// Geographic region definitions, relative to `mod_dir`
    pub regions_path: PathBuf,
    /// Culture group documents, relative to `mod_dir`
    pub cultures_dir: PathBuf,
    /// Prefix marking region definitions (stripped from region names)
    pub region_prefix: String,
    /// Group name for titles without a region
    pub titular_label: String,
    /// Fixed attribute keys; culture names are added at run time
    pub attribute_keys: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mod_dir: PathBuf::from("."),
            landed_titles_dir: PathBuf::from("common/landed_titles"),
            regions_path: PathBuf::from("map/geographical_region.json"),
            cultures_dir: PathBuf::from("common/cultures"),
            region_prefix: DEFAULT_REGION_PREFIX.to_string(),
            titular_label: "titular".to_string(),
            attribute_keys: DEFAULT_ATTRIBUTE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Get the XDG config directory for titloc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "titloc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("titloc.toml"))
}

/// Get the path to the local config file in a mod directory.
pub fn local_config_path(mod_dir: &Path) -> PathBuf {
    mod_dir.join(".titloc.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string, leaving it as-is on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["title", "foa"], &["adjective"])  // → ["adjective", "foa", "title"]
/// merge_array(&["title", "foa"], &["!foa"])       // → ["title"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for item in overlay {
        if let Some(negated) = item.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(item.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

impl Settings {
    /// Directory of landed-title documents.
    pub fn landed_titles_path(&self) -> PathBuf {
        self.mod_dir.join(&self.landed_titles_dir)
    }

    /// Region definition document.
    pub fn regions_file(&self) -> PathBuf {
        self.mod_dir.join(&self.regions_path)
    }

    /// Directory of culture group documents.
    pub fn cultures_path(&self) -> PathBuf {
        self.mod_dir.join(&self.cultures_dir)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        for path in [
            &mut self.mod_dir,
            &mut self.landed_titles_dir,
            &mut self.regions_path,
            &mut self.cultures_dir,
        ] {
            let expanded = expand_env_vars(&path.to_string_lossy());
            *path = PathBuf::from(expanded);
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut merged = self.apply_scalars(overlay);
        if let Some(keys) = &overlay.attribute_keys {
            merged.attribute_keys = merge_array(&self.attribute_keys, keys);
        }
        merged
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    ///
    /// Unlike `merge_with()` which uses union semantics, this method replaces
    /// arrays entirely if the global config specifies them.
    fn apply_global(&self, global: &RawSettings) -> Self {
        let mut applied = self.apply_scalars(global);
        if let Some(keys) = &global.attribute_keys {
            applied.attribute_keys = keys.clone();
        }
        applied
    }

    fn apply_scalars(&self, raw: &RawSettings) -> Self {
        Self {
            mod_dir: raw.mod_dir.clone().unwrap_or_else(|| self.mod_dir.clone()),
            landed_titles_dir: raw
                .landed_titles_dir
                .clone()
                .unwrap_or_else(|| self.landed_titles_dir.clone()),
            regions_path: raw
                .regions_path
                .clone()
                .unwrap_or_else(|| self.regions_path.clone()),
            cultures_dir: raw
                .cultures_dir
                .clone()
                .unwrap_or_else(|| self.cultures_dir.clone()),
            region_prefix: raw
                .region_prefix
                .clone()
                .unwrap_or_else(|| self.region_prefix.clone()),
            titular_label: raw
                .titular_label
                .clone()
                .unwrap_or_else(|| self.titular_label.clone()),
            attribute_keys: self.attribute_keys.clone(),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `mod_dir` - Optional mod directory; its `.titloc.toml` is the local
    ///   layer and it overrides any configured `mod_dir`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(mod_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        let local_dir = mod_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.mod_dir.clone());
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;

        if let Some(dir) = mod_dir {
            current.mod_dir = dir.to_path_buf();
        }
        current.expand_paths();

        Ok(current)
    }

    /// Apply TITLOC_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, None)
    }

    /// Apply `TITLOC_*` overrides from `vars`, or from the process environment if `None`.
    ///
    /// `TITLOC_ATTRIBUTE_KEYS` is a comma-separated list.
    fn apply_env_source(
        mut settings: Self,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TITLOC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("attribute_keys")
                .source(vars),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("mod_dir") {
            settings.mod_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("landed_titles_dir") {
            settings.landed_titles_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("regions_path") {
            settings.regions_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("cultures_dir") {
            settings.cultures_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("region_prefix") {
            settings.region_prefix = val;
        }
        if let Ok(val) = config.get_string("titular_label") {
            settings.titular_label = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("attribute_keys") {
            settings.attribute_keys = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# titloc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/titloc/titloc.toml  (defines your baseline)
#   Local:  <mod_dir>/.titloc.toml        (mod-specific additions)
#   Env:    TITLOC_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!key" in local config to REMOVE an inherited item:
#     attribute_keys = ["adjective", "!foa"]

# Root of the mod checkout
# mod_dir = "~/mods/SWMH"

# Pre-parsed inputs, relative to mod_dir
# landed_titles_dir = "common/landed_titles"
# regions_path = "map/geographical_region.json"
# cultures_dir = "common/cultures"

# Region definitions start with this prefix; it is stripped from region names
# region_prefix = "world_"

# Group name for titles without a region
# titular_label = "titular"

# Landed-title keys to extract (culture names are always added)
# attribute_keys = ["title", "title_female", "foa", "title_prefix", "short_name",
#                   "name_tier", "location_ruler_title", "dynasty_title_names", "male_names"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
