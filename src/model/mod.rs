//! Catalog entities: hosts, plugins and graphs.
//!
//! ```text
//! <datadir>/<host>/<plugin>[-<instance>]/<type>[-<instance>].rrd
//!              │          │                    │
//!              ▼          ▼                    ▼
//!            Host  ──▶  Plugin  ───────────▶  Graph
//! ```
//!
//! Entities are transient values built from the current directory listing.
//! Siblings sharing a primary name are collapsed into one entity whose
//! instance is an [`InstanceGroup::Group`](collectd_catalog_types::InstanceGroup).
//!
//! - [`host`]: host listing and lookup
//! - [`plugin`]: plugin listing, grouping and wildcard lookup
//! - [`graph`]: graph listing with the definition-driven grouping override

pub mod graph;
mod grouping;
pub mod host;
pub mod plugin;

pub use graph::Graph;
pub use host::Host;
pub use plugin::Plugin;

#[cfg(test)]
pub(crate) mod fixture {
    //! Fixture RRD trees and definitions shared by the model tests.

    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;

    use crate::definition::{GraphDefinition, GraphRegistry, Maxima, RenderOptions, TimeRange};
    use crate::error::Result;
    use crate::resolve::GraphSource;
    use crate::{Catalog, DataDirectoryIndex};

    /// Create empty `.rrd` files (and their directories) under `root`.
    pub fn touch(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"").unwrap();
        }
    }

    /// A definition answering with fixed maxima and recording build calls.
    #[derive(Debug, Default)]
    pub struct FixtureDefinition {
        pub list_type_instances: bool,
        pub maxima: Maxima,
        pub built: Mutex<Vec<(String, usize, RenderOptions)>>,
    }

    impl GraphDefinition for FixtureDefinition {
        fn list_type_instances(&self) -> bool {
            self.list_type_instances
        }

        fn get_max(&self, _sources: &[GraphSource], _range: &TimeRange) -> Result<Maxima> {
            Ok(self.maxima.clone())
        }

        fn build(
            &self,
            title: &str,
            sources: &[GraphSource],
            _range: &TimeRange,
            options: &RenderOptions,
        ) -> Result<Vec<u8>> {
            self.built
                .lock()
                .unwrap()
                .push((title.to_string(), sources.len(), options.clone()));
            Ok(title.as_bytes().to_vec())
        }
    }

    #[derive(Debug, Default)]
    pub struct FixtureRegistry {
        pub definitions: BTreeMap<String, Arc<FixtureDefinition>>,
    }

    impl FixtureRegistry {
        pub fn with(mut self, type_name: &str, definition: FixtureDefinition) -> Self {
            self.definitions
                .insert(type_name.to_string(), Arc::new(definition));
            self
        }
    }

    impl GraphRegistry for FixtureRegistry {
        fn get(&self, type_name: &str) -> Option<Arc<dyn GraphDefinition>> {
            self.definitions
                .get(type_name)
                .map(|d| Arc::clone(d) as Arc<dyn GraphDefinition>)
        }
    }

    /// A catalog over the given data directories.
    pub fn catalog(dirs: &[&TempDir], registry: FixtureRegistry) -> Catalog {
        let index = DataDirectoryIndex::from_directories(dirs.iter().map(|d| d.path()));
        Catalog::new(index, Arc::new(registry))
    }
}
