//! The catalog: entry point for every hierarchy query.

use std::sync::Arc;

use crate::definition::{GraphDefinition, GraphRegistry};
use crate::directory::DataDirectoryIndex;
use crate::error::Result;
use crate::scan::CatalogScanner;

/// Read-only view over a collectd RRD tree.
///
/// Holds the data directory index and the graph definitions; every query
/// rescans the filesystem and returns fresh entities, so a catalog can be
/// shared between threads.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use collectd_catalog::{Catalog, DataDirectoryIndex, EmptyRegistry};
///
/// let index = DataDirectoryIndex::from_config_file("/etc/collectd/collectd.conf");
/// let catalog = Catalog::new(index, Arc::new(EmptyRegistry));
///
/// for host in catalog.hosts()? {
///     for plugin in catalog.plugins(&host)? {
///         println!("{}", plugin.title());
///     }
/// }
/// # Ok::<(), collectd_catalog::CatalogError>(())
/// ```
#[derive(Debug)]
pub struct Catalog {
    directories: DataDirectoryIndex,
    definitions: Arc<dyn GraphRegistry>,
}

impl Catalog {
    /// A catalog over `directories`, binding graphs to `definitions`.
    pub fn new(directories: DataDirectoryIndex, definitions: Arc<dyn GraphRegistry>) -> Self {
        Self {
            directories,
            definitions,
        }
    }

    /// The data directory index.
    pub fn directories(&self) -> &DataDirectoryIndex {
        &self.directories
    }

    /// The graph definition registry.
    pub fn definitions(&self) -> &dyn GraphRegistry {
        self.definitions.as_ref()
    }

    /// Re-read the data directory configuration.
    pub fn reload(&mut self) -> Result<()> {
        self.directories.reload()
    }

    pub(crate) fn definition(&self, type_name: &str) -> Option<Arc<dyn GraphDefinition>> {
        self.definitions.get(type_name)
    }

    pub(crate) fn scanner(&self) -> Result<CatalogScanner<'_>> {
        Ok(CatalogScanner::new(self.directories.data_directories()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::EmptyRegistry;
    use crate::model::fixture::touch;
    use crate::model::{Graph, Host, Plugin};
    use std::thread;
    use tempfile::TempDir;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn catalog_and_entities_are_send_sync() {
        assert_send_sync::<Catalog>();
        assert_send_sync::<DataDirectoryIndex>();
        assert_send_sync::<Host>();
        assert_send_sync::<Plugin>();
        assert_send_sync::<Graph>();
    }

    #[test]
    fn concurrent_queries_agree() {
        let data = TempDir::new().unwrap();
        touch(data.path(), &["web01/cpu-0/cpu-idle.rrd", "web01/cpu-1/cpu-idle.rrd"]);
        let catalog = Catalog::new(
            DataDirectoryIndex::from_directories([data.path()]),
            Arc::new(EmptyRegistry),
        );

        let titles: Vec<Vec<String>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        catalog
                            .list_graphs("web01", "cpu-*")
                            .unwrap()
                            .iter()
                            .map(Graph::title)
                            .collect()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert!(titles.iter().all(|t| t == &vec!["web01/cpu-*/cpu".to_string()]));
    }
}
