//! Parsed input files, cached per path
//!
//! The loader is the one place parsed trees live; services own it and pass it
//! around explicitly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::TitleFile;
use crate::infrastructure::traits::FileSystem;

/// Extension of pre-parsed tree documents.
pub const SOURCE_EXTENSION: &str = "json";

/// Loads pre-parsed tree documents through the filesystem boundary.
pub struct SourceLoader {
    fs: Arc<dyn FileSystem>,
    cache: HashMap<PathBuf, Arc<TitleFile>>,
}

impl SourceLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            cache: HashMap::new(),
        }
    }

    /// Load every source under `paths`, in order.
    ///
    /// Directories expand to their `*.json` files sorted by name. `what`
    /// names the input kind in errors ("title files", "region definitions").
    #[instrument(level = "debug", skip(self, paths))]
    pub fn load_all(&mut self, paths: &[PathBuf], what: &str) -> ApplicationResult<Vec<Arc<TitleFile>>> {
        let mut files = Vec::new();
        for path in paths {
            for file in self.expand(path, what)? {
                files.push(self.load(&file, what)?);
            }
        }
        debug!(count = files.len(), "loaded {what}");
        Ok(files)
    }

    /// Load one document, reusing an earlier parse of the same path.
    pub fn load(&mut self, path: &Path, what: &str) -> ApplicationResult<Arc<TitleFile>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(Arc::clone(cached));
        }
        let content = self.fs.read_to_string(path).or_missing_input(what, path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let file = Arc::new(TitleFile::from_json(name, &content)?);
        self.cache.insert(path.to_path_buf(), Arc::clone(&file));
        Ok(file)
    }

    /// Number of parsed documents held.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn expand(&self, path: &Path, what: &str) -> ApplicationResult<Vec<PathBuf>> {
        if self.fs.is_dir(path) {
            let files = self
                .fs
                .list_files(path, SOURCE_EXTENSION)
                .with_path_context("list directory", path)?;
            if files.is_empty() {
                return Err(ApplicationError::NoInput {
                    what: what.to_string(),
                    path: path.to_path_buf(),
                });
            }
            Ok(files)
        } else {
            Ok(vec![path.to_path_buf()])
        }
    }
}
