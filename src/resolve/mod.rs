//! Recursive dependency resolution and bundling
//!
//! Walks a module's imports depth first, converting each transitively
//! imported file exactly once and concatenating the results dependency
//! first, so every module's text lands after the text of everything it
//! depends on. Cycles are detected against the active resolution path and
//! truncated with a diagnostic rather than resolved.
//!
//! File access goes through the [`ModuleLoader`] collaborator; the resolver
//! itself has no document-structure awareness and no retry policy.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::transform::convert_module;

/// Errors that can occur while bundling
#[derive(Debug, Error)]
pub enum BundleError {
    /// A referenced module's file could not be read. Fatal for the branch;
    /// text accumulated below the failure is discarded.
    #[error("failed to read module {}: {source}", .path.display())]
    Load {
        /// The path the loader was asked for
        path: PathBuf,
        /// The underlying read error
        #[source]
        source: io::Error,
    },
}

/// Supplies module text for a resolved path.
pub trait ModuleLoader {
    /// Read the full text of the module at `path`.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Loads module text straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl ModuleLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory loader backed by a path-to-text map.
///
/// Useful for hosts that carry module sources embedded rather than on disk,
/// and for tests. Lookup paths are normalized component-wise so `a/./b.js`
/// finds an entry stored as `a/b.js`.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` as the module at `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        let normalized: PathBuf = path.components().collect();
        self.files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no module at {}", normalized.display()),
            )
        })
    }
}

/// Bookkeeping threaded through a resolution walk.
#[derive(Debug, Default)]
pub struct BundleState {
    /// Filenames whose output has already been emitted.
    processed: HashSet<String>,
    /// Filenames on the active resolution path.
    in_process: HashSet<String>,
    /// Filename to the registry keys it imports directly.
    dependencies: HashMap<String, BTreeSet<String>>,
    /// Filenames at which a circular dependency was truncated.
    cycles: Vec<String>,
}

impl BundleState {
    /// Direct-import map gathered so far, for diagnostics.
    pub fn dependencies(&self) -> &HashMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    /// Filenames at which circular dependencies were truncated, in
    /// detection order.
    pub fn cycles(&self) -> &[String] {
        &self.cycles
    }

    /// Whether `filename`'s output has already been emitted.
    pub fn is_processed(&self, filename: &str) -> bool {
        self.processed.contains(filename)
    }
}

/// Converts a root module and its transitive imports into one bundle.
///
/// State persists across [`bundle`](Bundler::bundle) calls, so several
/// script blocks sharing modules emit each module only once.
pub struct Bundler<L> {
    loader: L,
    minify: bool,
    state: BundleState,
}

impl<L: ModuleLoader> Bundler<L> {
    /// Create a bundler over `loader`; `minify` applies to every module.
    pub fn new(loader: L, minify: bool) -> Self {
        Self {
            loader,
            minify,
            state: BundleState::default(),
        }
    }

    /// The bookkeeping gathered so far.
    pub fn state(&self) -> &BundleState {
        &self.state
    }

    /// Bundle `source` and everything it transitively imports.
    ///
    /// Import paths are resolved against `directory`. `module_filename` is
    /// the root's registry key, or `None` for an inline script. Returns the
    /// dependency-first concatenation, ending with the root's own text.
    pub fn bundle(
        &mut self,
        source: &str,
        directory: &Path,
        module_filename: Option<&str>,
    ) -> Result<String, BundleError> {
        if let Some(filename) = module_filename {
            if self.state.processed.contains(filename) {
                if self.state.in_process.contains(filename) {
                    warn!("circular dependency detected: module \"{filename}\" is already being processed");
                    self.state.cycles.push(filename.to_string());
                }
                return Ok(String::new());
            }
            self.state.processed.insert(filename.to_string());
            self.state.in_process.insert(filename.to_string());
        }

        info!(
            "processing module \"{}\"",
            module_filename.unwrap_or("<inline script>")
        );

        let converted = convert_module(source, module_filename, self.minify);

        let mut dependency_text = String::new();
        for (key, import_path) in &converted.imports {
            if let Some(filename) = module_filename {
                self.state
                    .dependencies
                    .entry(filename.to_string())
                    .or_default()
                    .insert(key.clone());
            }
            let full_path = directory.join(import_path);
            let child_directory = full_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let text = self
                .loader
                .load(&full_path)
                .map_err(|source| BundleError::Load {
                    path: full_path.clone(),
                    source,
                })?;
            dependency_text.push_str(&self.bundle(&text, &child_directory, Some(key.as_str()))?);
        }

        if let Some(filename) = module_filename {
            self.state.in_process.remove(filename);
        }

        Ok(dependency_text + &converted.text)
    }
}
