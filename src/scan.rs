//! Directory scanning over the data directories.
//!
//! The scanner lists the same relative sub-path in every data directory, so a
//! host whose data is split across several roots is seen as one.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use collectd_catalog_types::naming;
use tracing::trace;

/// A visible entry found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// File or directory name of the entry.
    pub name: String,
}

/// Lists entries of catalog sub-paths across a set of base directories.
#[derive(Debug, Clone, Copy)]
pub struct CatalogScanner<'a> {
    base_dirs: &'a BTreeSet<PathBuf>,
}

impl<'a> CatalogScanner<'a> {
    /// A scanner over `base_dirs`.
    pub fn new(base_dirs: &'a BTreeSet<PathBuf>) -> Self {
        Self { base_dirs }
    }

    /// Every visible entry of every `base/sub_path` directory.
    ///
    /// Names starting with `.` are skipped. Sub-paths that do not exist or
    /// are not directories contribute nothing.
    pub fn list_entries<P: AsRef<Path>>(&self, sub_paths: &[P]) -> Vec<ScanEntry> {
        let mut entries = Vec::new();
        for base in self.base_dirs {
            for sub_path in sub_paths {
                let dir = base.join(sub_path);
                let listing = match fs::read_dir(&dir) {
                    Ok(listing) => listing,
                    Err(e) => {
                        trace!("Skipping {}: {}", dir.display(), e);
                        continue;
                    }
                };

                let mut found: Vec<ScanEntry> = listing
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| {
                        let name = entry.file_name().into_string().ok()?;
                        if name.starts_with('.') {
                            return None;
                        }
                        Some(ScanEntry {
                            path: entry.path(),
                            name,
                        })
                    })
                    .collect();
                found.sort_by(|a, b| a.name.cmp(&b.name));
                entries.extend(found);
            }
        }
        entries
    }

    /// Names of the subdirectories of every `base/sub_path`.
    pub fn list_subdirectories<P: AsRef<Path>>(&self, sub_paths: &[P]) -> Vec<String> {
        self.list_entries(sub_paths)
            .into_iter()
            .filter(|entry| entry.path.is_dir())
            .map(|entry| entry.name)
            .collect()
    }

    /// Names of the round-robin files of every `base/sub_path`.
    pub fn list_round_robin_files<P: AsRef<Path>>(&self, sub_paths: &[P]) -> Vec<String> {
        self.list_entries(sub_paths)
            .into_iter()
            .filter(|entry| {
                entry.path.is_file() && naming::strip_rrd_extension(&entry.name).is_some()
            })
            .map(|entry| entry.name)
            .collect()
    }
}
