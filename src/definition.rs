//! Graph definitions: how a graph type is measured and rendered.
//!
//! The catalog only needs three things from a definition: whether the type
//! lists its instances separately, the maximum of its sources over a time
//! range, and a way to build the rendered artifact. The [`GraphDefinition`]
//! and [`GraphRegistry`] traits are the seam for plugging in a real RRD
//! reader and renderer.
//!
//! [`DefinitionFile`] is the registry shipped with the crate. It reads the
//! per-type metadata from JSON:
//!
//! ```json
//! {
//!     "cpu": { "title": "CPU usage", "vertical_label": "jiffies" },
//!     "disk_octets": { "list_type_instances": true }
//! }
//! ```
//!
//! Its definitions carry no value reader, and building produces a JSON
//! render plan for an external renderer.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::resolve::GraphSource;

/// Time range of a graph, as rrdtool time specifications (`-1d`, `now`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    /// A range from `start` to `end`.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new("-1d", "now")
    }
}

/// Rendering options passed through to the graph backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions(BTreeMap<String, String>);

impl RenderOptions {
    /// No options.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of option `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set an option, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Per-source maxima, keyed by source label.
pub type Maxima = BTreeMap<String, f64>;

/// Statistics and rendering for one graph type.
pub trait GraphDefinition: Send + Sync + Debug {
    /// Whether each type instance is listed as its own graph instead of
    /// being collapsed into a group.
    fn list_type_instances(&self) -> bool;

    /// Maximum value of each source over `range`.
    fn get_max(&self, sources: &[GraphSource], range: &TimeRange) -> Result<Maxima>;

    /// Build the rendered artifact.
    fn build(
        &self,
        title: &str,
        sources: &[GraphSource],
        range: &TimeRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>>;
}

/// Lookup of graph definitions by type name.
pub trait GraphRegistry: Send + Sync + Debug {
    fn get(&self, type_name: &str) -> Option<Arc<dyn GraphDefinition>>;
}

/// A registry without definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl GraphRegistry for EmptyRegistry {
    fn get(&self, _type_name: &str) -> Option<Arc<dyn GraphDefinition>> {
        None
    }
}

/// Metadata of one graph type in a definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSpec {
    #[serde(default)]
    pub list_type_instances: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_label: Option<String>,
}

/// A definition read from a [`DefinitionFile`].
#[derive(Debug, Clone)]
pub struct StaticDefinition {
    type_name: String,
    spec: DefinitionSpec,
}

/// The artifact built by a [`StaticDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub title: String,
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_label: Option<String>,
    pub sources: Vec<PlanSource>,
    pub range: TimeRange,
    pub options: RenderOptions,
}

/// One labelled file of a [`RenderPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSource {
    pub label: String,
    pub path: PathBuf,
}

impl StaticDefinition {
    /// A definition of `type_name` described by `spec`.
    pub fn new(type_name: impl Into<String>, spec: DefinitionSpec) -> Self {
        Self {
            type_name: type_name.into(),
            spec,
        }
    }
}

impl GraphDefinition for StaticDefinition {
    fn list_type_instances(&self) -> bool {
        self.spec.list_type_instances
    }

    fn get_max(&self, _sources: &[GraphSource], _range: &TimeRange) -> Result<Maxima> {
        Err(CatalogError::Backend(format!(
            "definition {} has no value reader",
            self.type_name
        )))
    }

    fn build(
        &self,
        title: &str,
        sources: &[GraphSource],
        range: &TimeRange,
        options: &RenderOptions,
    ) -> Result<Vec<u8>> {
        let plan = RenderPlan {
            title: title.to_string(),
            type_name: self.type_name.clone(),
            type_title: self.spec.title.clone(),
            vertical_label: self.spec.vertical_label.clone(),
            sources: sources
                .iter()
                .map(|s| PlanSource {
                    label: s.label.clone(),
                    path: s.path.clone(),
                })
                .collect(),
            range: range.clone(),
            options: options.clone(),
        };
        serde_json::to_vec_pretty(&plan).map_err(|e| CatalogError::Backend(e.to_string()))
    }
}

/// Graph definitions read from a JSON file keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct DefinitionFile {
    definitions: BTreeMap<String, Arc<StaticDefinition>>,
}

impl DefinitionFile {
    /// Load definitions from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let specs: BTreeMap<String, DefinitionSpec> =
            serde_json::from_str(&content).map_err(|source| CatalogError::Definitions {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Loaded {} graph definitions from {}", specs.len(), path.display());
        Ok(Self::from_specs(specs))
    }

    /// Definitions from already parsed specs.
    pub fn from_specs<I, K>(specs: I) -> Self
    where
        I: IntoIterator<Item = (K, DefinitionSpec)>,
        K: Into<String>,
    {
        let definitions = specs
            .into_iter()
            .map(|(name, spec)| {
                let name = name.into();
                let definition = Arc::new(StaticDefinition::new(name.clone(), spec));
                (name, definition)
            })
            .collect();
        Self { definitions }
    }

    /// Number of graph types defined.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the file defines no graph type.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Type names with a definition.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl GraphRegistry for DefinitionFile {
    fn get(&self, type_name: &str) -> Option<Arc<dyn GraphDefinition>> {
        self.definitions
            .get(type_name)
            .map(|d| Arc::clone(d) as Arc<dyn GraphDefinition>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "cpu": { "title": "CPU usage", "vertical_label": "jiffies" },
            "disk_octets": { "list_type_instances": true },
            "load": {}
        }"#
    }

    #[test]
    fn load_definition_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_json()).unwrap();

        let definitions = DefinitionFile::load(file.path()).unwrap();
        assert_eq!(definitions.len(), 3);
        assert_eq!(
            definitions.type_names().collect::<Vec<_>>(),
            vec!["cpu", "disk_octets", "load"]
        );
        assert!(definitions.get("disk_octets").unwrap().list_type_instances());
        assert!(!definitions.get("cpu").unwrap().list_type_instances());
        assert!(definitions.get("memory").is_none());
    }

    #[test]
    fn invalid_definition_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not valid json").unwrap();

        let err = DefinitionFile::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Definitions { .. }));
    }

    #[test]
    fn missing_definition_file() {
        let err = DefinitionFile::load(Path::new("/nonexistent/graphs.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn static_definition_builds_render_plan() {
        let definition = StaticDefinition::new(
            "cpu",
            DefinitionSpec {
                title: Some("CPU usage".to_string()),
                ..Default::default()
            },
        );
        let sources = vec![GraphSource {
            label: "0".to_string(),
            relative: PathBuf::from("web01/cpu-0/cpu.rrd"),
            path: PathBuf::from("/var/lib/collectd/rrd/web01/cpu-0/cpu.rrd"),
        }];
        let options: RenderOptions = [("upper", "100")].into_iter().collect();

        let bytes = definition
            .build("web01/cpu-*/cpu", &sources, &TimeRange::default(), &options)
            .unwrap();
        let plan: RenderPlan = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(plan.title, "web01/cpu-*/cpu");
        assert_eq!(plan.type_title.as_deref(), Some("CPU usage"));
        assert_eq!(plan.sources.len(), 1);
        assert_eq!(plan.sources[0].label, "0");
        assert_eq!(plan.range.start, "-1d");
        assert_eq!(plan.options.get("upper"), Some("100"));
    }

    #[test]
    fn static_definition_has_no_value_reader() {
        let definition = StaticDefinition::new("load", DefinitionSpec::default());
        let err = definition.get_max(&[], &TimeRange::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Backend(_)));
    }

    #[test]
    fn empty_registry_has_nothing() {
        assert!(EmptyRegistry.get("cpu").is_none());
    }

    #[test]
    fn render_options_set_and_get() {
        let mut options = RenderOptions::new();
        assert!(options.is_empty());
        assert_eq!(options.set("upper", "50%"), None);
        assert_eq!(options.set("upper", "15"), Some("50%".to_string()));
        assert_eq!(options.iter().collect::<Vec<_>>(), vec![("upper", "15")]);
    }
}
