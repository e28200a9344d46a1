//! Application settings.
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables prefixed with `COLLECTD_CATALOG_`:
//!
//! ```toml
//! collectd_config = "/etc/collectd/collectd.conf"
//! graph_definitions = "/etc/collectd-catalog/graphs.json"
//! # Bypass collectd.conf and scan these directories instead
//! data_dirs = ["/var/lib/collectd/rrd"]
//! ```
//!
//! `COLLECTD_CATALOG_DATA_DIRS` takes a `:`-separated list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::definition::{DefinitionFile, EmptyRegistry, GraphRegistry};
use crate::directory::DataDirectoryIndex;
use crate::error::Result;

/// Default location of the collectd configuration.
pub const DEFAULT_COLLECTD_CONFIG: &str = "/etc/collectd/collectd.conf";

const ENV_PREFIX: &str = "COLLECTD_CATALOG";

/// Where the catalog finds its data and definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// collectd configuration holding the `DataDir` entries.
    #[serde(default = "default_collectd_config")]
    pub collectd_config: PathBuf,
    /// JSON graph definition file.
    #[serde(default)]
    pub graph_definitions: Option<PathBuf>,
    /// Explicit data directories; when set, `collectd_config` is not read.
    #[serde(default)]
    pub data_dirs: Vec<PathBuf>,
}

fn default_collectd_config() -> PathBuf {
    PathBuf::from(DEFAULT_COLLECTD_CONFIG)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collectd_config: default_collectd_config(),
            graph_definitions: None,
            data_dirs: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::build(path, None)
    }

    /// Load settings with an explicit environment instead of the process one.
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        Self::build(path, Some(env))
    }

    fn build(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(":")
            .with_list_parse_key("data_dirs")
            .source(env);
        let settings = builder.add_source(environment).build()?.try_deserialize()?;
        Ok(settings)
    }

    /// The data directory index these settings describe.
    pub fn directory_index(&self) -> DataDirectoryIndex {
        if self.data_dirs.is_empty() {
            DataDirectoryIndex::from_config_file(&self.collectd_config)
        } else {
            DataDirectoryIndex::from_directories(self.data_dirs.iter().cloned())
        }
    }

    /// The graph definitions these settings describe.
    pub fn registry(&self) -> Result<Arc<dyn GraphRegistry>> {
        match &self.graph_definitions {
            Some(path) => Ok(Arc::new(DefinitionFile::load(path)?)),
            None => Ok(Arc::new(EmptyRegistry)),
        }
    }

    /// A catalog built from these settings.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new(self.directory_index(), self.registry()?))
    }
}
