//! Graph source resolution.
//!
//! Expands a plugin into the directories it stands for, and a graph into the
//! labelled round-robin files that must be read to measure or render it.

use std::path::PathBuf;

use collectd_catalog_types::{naming, InstanceGroup};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{Graph, Plugin};

/// A plugin directory, relative to a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSource {
    /// The plugin instance for grouped plugins, empty otherwise.
    pub label: String,
    pub directory: PathBuf,
}

/// A round-robin file backing a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSource {
    pub label: String,
    /// Path relative to the data directory.
    pub relative: PathBuf,
    /// Path of the file in the data directory that holds it.
    pub path: PathBuf,
}

impl Plugin {
    /// The directories holding this plugin's files.
    pub fn source_directories(&self) -> Vec<PluginSource> {
        let host_dir = PathBuf::from(self.host().path());
        match self.instance() {
            InstanceGroup::Group(members) => members
                .iter()
                .map(|member| PluginSource {
                    label: member.clone(),
                    directory: host_dir.join(naming::join(self.name(), Some(member))),
                })
                .collect(),
            InstanceGroup::Single(_) | InstanceGroup::Absent => vec![PluginSource {
                label: String::new(),
                directory: host_dir.join(self.full_name()),
            }],
        }
    }
}

impl Graph {
    /// Labelled relative paths of the files backing this graph.
    ///
    /// A grouped graph is the product of its instances and the plugin
    /// directories, labelled by graph instance only.
    pub fn relative_files(&self) -> Vec<(String, PathBuf)> {
        let plugin_dirs = self.plugin().source_directories();
        match self.instance() {
            InstanceGroup::Group(members) => members
                .iter()
                .flat_map(|member| {
                    let file = naming::rrd_file_name(&naming::join(self.type_name(), Some(member)));
                    plugin_dirs
                        .iter()
                        .map(move |dir| (member.clone(), dir.directory.join(&file)))
                })
                .collect(),
            InstanceGroup::Single(_) | InstanceGroup::Absent => {
                let file = naming::rrd_file_name(&self.full_name());
                plugin_dirs
                    .into_iter()
                    .map(|dir| (dir.label, dir.directory.join(&file)))
                    .collect()
            }
        }
    }
}

impl Catalog {
    /// The files backing `graph`, resolved against the data directories.
    ///
    /// Fails if any file is missing from every data directory.
    pub fn graph_sources(&self, graph: &Graph) -> Result<Vec<GraphSource>> {
        graph
            .relative_files()
            .into_iter()
            .map(|(label, relative)| {
                let path = self.directories().resolve_file(&relative)?;
                Ok(GraphSource {
                    label,
                    relative,
                    path,
                })
            })
            .collect()
    }
}
