//! Graphs: the `type[-instance].rrd` files of a plugin.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use collectd_catalog_types::{naming, EntityKind, InstanceGroup, WILDCARD};
use tracing::debug;

use super::grouping::group_siblings;
use super::Plugin;
use crate::catalog::Catalog;
use crate::definition::GraphDefinition;
use crate::error::{CatalogError, Result};

/// A graph of a plugin, bound to the definition of its type.
///
/// The definition is looked up when the graph is built and may be missing;
/// that only matters once the graph is generated.
#[derive(Debug, Clone)]
pub struct Graph {
    plugin: Plugin,
    type_name: String,
    instance: InstanceGroup,
    definition: Option<Arc<dyn GraphDefinition>>,
}

impl Graph {
    /// A graph of `plugin`, bound to `definition` if there is one.
    pub fn new(
        plugin: Plugin,
        type_name: impl Into<String>,
        instance: InstanceGroup,
        definition: Option<Arc<dyn GraphDefinition>>,
    ) -> Self {
        Self {
            plugin,
            type_name: type_name.into(),
            instance,
            definition,
        }
    }

    /// The plugin holding the graph files.
    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    /// The collectd type, the primary part of the file name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The type instance, or the grouped instances.
    pub fn instance(&self) -> &InstanceGroup {
        &self.instance
    }

    /// The definition of the graph type, if registered.
    pub fn definition(&self) -> Option<&Arc<dyn GraphDefinition>> {
        self.definition.as_ref()
    }

    /// `type-instance` for a single instance, otherwise `type`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.type_name, self.instance.suffix())
    }

    /// `host/plugin/type`.
    pub fn title(&self) -> String {
        format!("{}/{}", self.plugin.title(), self.full_name())
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.plugin == other.plugin
            && self.type_name == other.type_name
            && self.instance == other.instance
    }
}

impl Eq for Graph {}

impl Hash for Graph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plugin.hash(state);
        self.type_name.hash(state);
        self.instance.hash(state);
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

impl Catalog {
    /// All graphs of `plugin`.
    ///
    /// Files of the same type are grouped like plugins, except for types
    /// whose definition lists type instances separately.
    pub fn graphs(&self, plugin: &Plugin) -> Result<Vec<Graph>> {
        let dirs: Vec<_> = plugin
            .source_directories()
            .into_iter()
            .map(|source| source.directory)
            .collect();
        let stems: Vec<String> = self
            .scanner()?
            .list_round_robin_files(&dirs)
            .iter()
            .filter_map(|file| naming::strip_rrd_extension(file))
            .map(str::to_string)
            .collect();

        let grouped = group_siblings(stems, |type_name| {
            self.definition(type_name)
                .is_some_and(|definition| definition.list_type_instances())
        });
        Ok(grouped
            .into_iter()
            .map(|(type_name, instance)| self.bind_graph(plugin, type_name, instance))
            .collect())
    }

    /// The graph `type_name` of `plugin`.
    ///
    /// With an instance, the single graph of that instance; the wildcard `*`
    /// asks for the grouped view. Without, the grouped view if there is one,
    /// else the un-suffixed file.
    pub fn graph(&self, plugin: &Plugin, type_name: &str, instance: Option<&str>) -> Result<Graph> {
        let mut candidates = self
            .graphs(plugin)?
            .into_iter()
            .filter(|graph| graph.type_name == type_name);
        let found = match instance {
            Some(WILDCARD) => candidates.find(|graph| graph.instance.is_group()),
            Some(instance) => candidates.find(|graph| graph.instance.single() == Some(instance)),
            None => candidates
                .filter(|graph| !graph.instance.is_single())
                .min_by_key(|graph| !graph.instance.is_group()),
        };
        found.ok_or_else(|| {
            debug!("No graph {:?} {:?} in {}", type_name, instance, plugin);
            CatalogError::not_found(EntityKind::Graph, naming::join(type_name, instance))
        })
    }

    fn bind_graph(&self, plugin: &Plugin, type_name: String, instance: InstanceGroup) -> Graph {
        let definition = self.definition(&type_name);
        Graph::new(plugin.clone(), type_name, instance, definition)
    }
}
