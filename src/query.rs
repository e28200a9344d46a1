//! Query surface for front-ends.
//!
//! Front-ends address plugins with a single path segment:
//!
//! | Segment       | Selects                                              |
//! |---------------|------------------------------------------------------|
//! | `cpu`         | every `cpu` entry of the host                        |
//! | `cpu-`        | same as `cpu`                                        |
//! | `cpu-*`       | the grouped `cpu` plugin                             |
//! | `cpu-1*`      | every `cpu` instance starting with `1`               |
//! | `cpu-0`       | the single instance `0`                              |
//!
//! and graphs with `type[-instance]`.

use std::fmt;

use collectd_catalog_types::{naming, EntityKind, WILDCARD};

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::model::{Graph, Host, Plugin};

/// A parsed plugin path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSelector {
    /// Every entry with this primary name.
    All { name: String },
    /// The grouped entry (`name-*`).
    Grouped { name: String },
    /// Every instance starting with `prefix` (`name-prefix*`).
    Prefix { name: String, prefix: String },
    /// One instance (`name-instance`).
    Exact { name: String, instance: String },
}

impl PluginSelector {
    /// Parse a plugin path segment.
    pub fn parse(segment: &str) -> Self {
        let (name, instance) = naming::split(segment);
        let name = name.to_string();
        match instance {
            None | Some("") => PluginSelector::All { name },
            Some(instance) => match instance.strip_suffix(WILDCARD) {
                Some(prefix) => {
                    let prefix = prefix.trim_end_matches(WILDCARD);
                    if prefix.is_empty() {
                        PluginSelector::Grouped { name }
                    } else {
                        PluginSelector::Prefix {
                            name,
                            prefix: prefix.to_string(),
                        }
                    }
                }
                None => PluginSelector::Exact {
                    name,
                    instance: instance.to_string(),
                },
            },
        }
    }

    /// The primary plugin name.
    pub fn name(&self) -> &str {
        match self {
            PluginSelector::All { name }
            | PluginSelector::Grouped { name }
            | PluginSelector::Prefix { name, .. }
            | PluginSelector::Exact { name, .. } => name,
        }
    }
}

impl fmt::Display for PluginSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSelector::All { name } => write!(f, "{}", name),
            PluginSelector::Grouped { name } => write!(f, "{}-{}", name, WILDCARD),
            PluginSelector::Prefix { name, prefix } => write!(f, "{}-{}{}", name, prefix, WILDCARD),
            PluginSelector::Exact { name, instance } => write!(f, "{}-{}", name, instance),
        }
    }
}

impl Catalog {
    /// Plugins of `host` matching `selector`.
    ///
    /// A prefix narrows a grouped plugin to its matching instances. A
    /// selector matching nothing gives an empty list.
    pub fn select_plugins(&self, host: &Host, selector: &PluginSelector) -> Result<Vec<Plugin>> {
        let lookup = match selector {
            PluginSelector::All { name } => {
                return Ok(self
                    .plugins(host)?
                    .into_iter()
                    .filter(|plugin| plugin.name() == name)
                    .collect());
            }
            PluginSelector::Prefix { name, prefix } => {
                return Ok(self
                    .plugins(host)?
                    .into_iter()
                    .filter(|plugin| plugin.name() == name)
                    .filter_map(|plugin| {
                        let narrowed = plugin.instance().narrow_to_prefix(prefix)?;
                        Some(Plugin::new(host.clone(), name.clone(), narrowed))
                    })
                    .collect());
            }
            PluginSelector::Grouped { name } => self.plugin(host, name, Some(WILDCARD)),
            PluginSelector::Exact { name, instance } => {
                self.plugin(host, name, Some(instance.as_str()))
            }
        };

        match lookup {
            Ok(plugin) => Ok(vec![plugin]),
            Err(CatalogError::NotFound {
                kind: EntityKind::Plugin,
                ..
            }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Graphs of all `plugins`, ordered by plugin then graph name.
    pub fn graphs_of(&self, plugins: &[Plugin]) -> Result<Vec<Graph>> {
        let mut graphs = Vec::new();
        for plugin in plugins {
            graphs.extend(self.graphs(plugin)?);
        }
        graphs.sort_by_cached_key(|graph| (graph.plugin().full_name(), graph.full_name()));
        Ok(graphs)
    }

    /// Graphs of the plugins of `host_name` selected by `plugin_segment`.
    pub fn list_graphs(&self, host_name: &str, plugin_segment: &str) -> Result<Vec<Graph>> {
        let host = self.host(host_name)?;
        let plugins = self.select_plugins(&host, &PluginSelector::parse(plugin_segment))?;
        self.graphs_of(&plugins)
    }

    /// The graph addressed by host, plugin segment and `type[-instance]`.
    ///
    /// When the plugin segment selects several plugins the first is used.
    pub fn find_graph(
        &self,
        host_name: &str,
        plugin_segment: &str,
        graph_segment: &str,
    ) -> Result<Graph> {
        let host = self.host(host_name)?;
        let selector = PluginSelector::parse(plugin_segment);
        let plugin = self
            .select_plugins(&host, &selector)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found(EntityKind::Plugin, selector.to_string()))?;

        let (type_name, instance) = naming::split(graph_segment);
        self.graph(&plugin, type_name, instance)
    }
}
