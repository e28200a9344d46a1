//! Data directory index.
//!
//! Reads the `DataDir` and `LibDir` settings of a collectd configuration
//! file and resolves catalog-relative paths against the data directories.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use collectd_catalog_types::EntityKind;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Directories listed in a collectd configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directories {
    /// Roots of the RRD tree.
    pub data: BTreeSet<PathBuf>,
    /// Plugin library directories.
    pub lib: BTreeSet<PathBuf>,
}

impl Directories {
    /// Read and parse a collectd configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directories = Self::parse(&content);
        info!(
            "Loaded {} with {} data and {} lib directories",
            path.display(),
            directories.data.len(),
            directories.lib.len()
        );
        Ok(directories)
    }

    /// Parse configuration text.
    ///
    /// Accepts `Key "value"` as well as `key: "value"` lines. Keys are case
    /// insensitive, values must be double-quoted, and a directory is only
    /// kept if it exists.
    pub fn parse(content: &str) -> Self {
        let mut directories = Self::default();
        for (key, value) in content.lines().filter_map(parse_line) {
            let target = match key.as_str() {
                "datadir" => &mut directories.data,
                "libdir" => &mut directories.lib,
                _ => continue,
            };
            let path = PathBuf::from(value);
            if path.is_dir() {
                target.insert(path);
            } else {
                warn!("Ignoring {} {}: not a directory", key, path.display());
            }
        }
        directories
    }
}

/// Parse one configuration line into a lowercase key and its unquoted value.
fn parse_line(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = match line.split_once(':') {
        Some((key, value)) if !key.trim().contains(char::is_whitespace) => (key, value),
        _ => line.split_once(char::is_whitespace)?,
    };
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') {
        return None;
    }

    Some((key.to_lowercase(), &value[1..value.len() - 1]))
}

/// Where an index gets its directories from.
#[derive(Debug, Clone)]
enum Origin {
    ConfigFile(PathBuf),
    Explicit(Vec<PathBuf>),
}

/// The configured root directories of the RRD tree.
///
/// Built from a collectd configuration file, which is loaded lazily on first
/// access and then kept until [`DataDirectoryIndex::reload`] is called.
#[derive(Debug)]
pub struct DataDirectoryIndex {
    origin: Origin,
    loaded: OnceLock<Directories>,
}

impl DataDirectoryIndex {
    /// Index backed by a collectd configuration file, loaded on first use.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            origin: Origin::ConfigFile(path.as_ref().to_path_buf()),
            loaded: OnceLock::new(),
        }
    }

    /// Index over an explicit list of data directories.
    ///
    /// Paths that are not directories are dropped.
    pub fn from_directories<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        let index = Self {
            origin: Origin::Explicit(paths),
            loaded: OnceLock::new(),
        };
        let _ = index.loaded.set(index.read_origin_explicit());
        index
    }

    /// The configuration file this index reads, if any.
    pub fn config_file(&self) -> Option<&Path> {
        match &self.origin {
            Origin::ConfigFile(path) => Some(path),
            Origin::Explicit(_) => None,
        }
    }

    /// Directories containing an RRD tree.
    pub fn data_directories(&self) -> Result<&BTreeSet<PathBuf>> {
        Ok(&self.directories()?.data)
    }

    /// Plugin library directories.
    pub fn lib_directories(&self) -> Result<&BTreeSet<PathBuf>> {
        Ok(&self.directories()?.lib)
    }

    /// Drop the loaded directories and read them again.
    pub fn reload(&mut self) -> Result<()> {
        let directories = self.read_origin()?;
        self.loaded = OnceLock::from(directories);
        Ok(())
    }

    /// Absolute path of the first data directory holding `relative` as a
    /// regular file.
    pub fn resolve_file<P: AsRef<Path>>(&self, relative: P) -> Result<PathBuf> {
        let relative = relative.as_ref();
        for data_dir in self.data_directories()? {
            let candidate = data_dir.join(relative);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        debug!("No data directory holds {}", relative.display());
        Err(CatalogError::not_found(
            EntityKind::File,
            relative.display().to_string(),
        ))
    }

    fn directories(&self) -> Result<&Directories> {
        if let Some(directories) = self.loaded.get() {
            return Ok(directories);
        }
        // Concurrent first calls may each parse the file; only one result is kept.
        let directories = self.read_origin()?;
        Ok(self.loaded.get_or_init(|| directories))
    }

    fn read_origin(&self) -> Result<Directories> {
        match &self.origin {
            Origin::ConfigFile(path) => Directories::load(path),
            Origin::Explicit(_) => Ok(self.read_origin_explicit()),
        }
    }

    fn read_origin_explicit(&self) -> Directories {
        let mut directories = Directories::default();
        if let Origin::Explicit(paths) = &self.origin {
            for path in paths {
                if path.is_dir() {
                    directories.data.insert(path.clone());
                } else {
                    warn!("Ignoring data directory {}: not a directory", path.display());
                }
            }
        }
        directories
    }
}
