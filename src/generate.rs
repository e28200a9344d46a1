//! Graph generation over the graph definitions.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::definition::{GraphDefinition, Maxima, RenderOptions, TimeRange};
use crate::error::{CatalogError, Result};
use crate::model::Graph;

/// Option holding the upper bound of the vertical axis.
pub const UPPER_OPTION: &str = "upper";

/// Parse a percentage option value (`"50%"` → `50.0`).
///
/// Returns `None` for values that are not percentages.
pub fn parse_percentage(option: &str, value: &str) -> Result<Option<f64>> {
    let Some(number) = value.strip_suffix('%') else {
        return Ok(None);
    };
    number
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CatalogError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
        })
}

/// `percent` of the largest of `maxima`.
pub fn scale_maximum(maxima: &Maxima, percent: f64) -> Option<f64> {
    maxima
        .values()
        .copied()
        .reduce(f64::max)
        .map(|max| max * percent / 100.0)
}

impl Catalog {
    /// Maximum of each source of `graph` over `range`.
    pub fn calculate_max(&self, graph: &Graph, range: &TimeRange) -> Result<Maxima> {
        let definition = required_definition(graph)?;
        let sources = self.graph_sources(graph)?;
        definition.get_max(&sources, range)
    }

    /// Render `graph` over `range`.
    ///
    /// An `upper` option given as a percentage is replaced by that share of
    /// the largest value any source reaches over `range`.
    pub fn generate(
        &self,
        graph: &Graph,
        range: &TimeRange,
        mut options: RenderOptions,
    ) -> Result<Vec<u8>> {
        let definition = required_definition(graph)?;
        let sources = self.graph_sources(graph)?;

        if let Some(upper) = options.get(UPPER_OPTION) {
            if let Some(percent) = parse_percentage(UPPER_OPTION, upper)? {
                let maxima = definition.get_max(&sources, range)?;
                let limit = scale_maximum(&maxima, percent).ok_or_else(|| {
                    CatalogError::Backend(format!("no maximum for {}", graph.title()))
                })?;
                debug!("Resolved upper {}% of {} to {}", percent, graph.title(), limit);
                options.set(UPPER_OPTION, limit.to_string());
            }
        }

        definition.build(&graph.title(), &sources, range, &options)
    }
}

fn required_definition(graph: &Graph) -> Result<&Arc<dyn GraphDefinition>> {
    graph
        .definition()
        .ok_or_else(|| CatalogError::MissingDefinition(graph.type_name().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture::{catalog, touch, FixtureDefinition, FixtureRegistry};
    use crate::model::Host;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn maxima(values: &[(&str, f64)]) -> Maxima {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn setup() -> (TempDir, Catalog, Arc<FixtureDefinition>) {
        let data = TempDir::new().unwrap();
        touch(
            data.path(),
            &[
                "web01/df/df-root.rrd",
                "web01/df/df-var.rrd",
                "web01/df/df-home.rrd",
                "web01/load/load.rrd",
            ],
        );
        let registry = FixtureRegistry::default().with(
            "df",
            FixtureDefinition {
                maxima: maxima(&[("root", 10.0), ("var", 30.0), ("home", 20.0)]),
                ..Default::default()
            },
        );
        let definition = Arc::clone(&registry.definitions["df"]);
        let catalog = catalog(&[&data], registry);
        (data, catalog, definition)
    }

    #[test]
    fn percentage_parsing() {
        assert_eq!(parse_percentage("upper", "50%").unwrap(), Some(50.0));
        assert_eq!(parse_percentage("upper", "12.5%").unwrap(), Some(12.5));
        assert_eq!(parse_percentage("upper", "100").unwrap(), None);

        let err = parse_percentage("upper", "lots%").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for upper: lots%");
    }

    #[test]
    fn scale_maximum_uses_largest_value() {
        let values = maxima(&[("a", 10.0), ("b", 30.0), ("c", 20.0)]);
        assert_eq!(scale_maximum(&values, 50.0), Some(15.0));
        assert_eq!(scale_maximum(&BTreeMap::new(), 50.0), None);
    }

    #[test]
    fn generate_resolves_percentage_upper() {
        let (_data, catalog, definition) = setup();
        let plugin = catalog.plugin(&Host::new("web01"), "df", None).unwrap();
        let graph = catalog.graph(&plugin, "df", None).unwrap();

        let options: RenderOptions = [("upper", "50%"), ("lower", "0")].into_iter().collect();
        let artifact = catalog
            .generate(&graph, &TimeRange::default(), options)
            .unwrap();
        assert_eq!(artifact, b"web01/df/df".to_vec());

        let built = definition.built.lock().unwrap();
        assert_eq!(built.len(), 1);
        let (title, sources, options) = &built[0];
        assert_eq!(title, "web01/df/df");
        assert_eq!(*sources, 3);
        assert_eq!(options.get("upper"), Some("15"));
        assert_eq!(options.get("lower"), Some("0"));
    }

    #[test]
    fn generate_keeps_absolute_upper() {
        let (_data, catalog, definition) = setup();
        let plugin = catalog.plugin(&Host::new("web01"), "df", None).unwrap();
        let graph = catalog.graph(&plugin, "df", None).unwrap();

        let options: RenderOptions = [("upper", "100")].into_iter().collect();
        catalog
            .generate(&graph, &TimeRange::default(), options)
            .unwrap();
        assert_eq!(
            definition.built.lock().unwrap()[0].2.get("upper"),
            Some("100")
        );
    }

    #[test]
    fn generate_rejects_bad_percentage() {
        let (_data, catalog, definition) = setup();
        let plugin = catalog.plugin(&Host::new("web01"), "df", None).unwrap();
        let graph = catalog.graph(&plugin, "df", None).unwrap();

        let options: RenderOptions = [("upper", "half%")].into_iter().collect();
        let err = catalog
            .generate(&graph, &TimeRange::default(), options)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidOption { .. }));
        assert!(definition.built.lock().unwrap().is_empty());
    }

    #[test]
    fn generate_requires_definition() {
        let (_data, catalog, _definition) = setup();
        let plugin = catalog.plugin(&Host::new("web01"), "load", None).unwrap();
        let graph = catalog.graph(&plugin, "load", None).unwrap();

        let err = catalog
            .generate(&graph, &TimeRange::default(), RenderOptions::new())
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingDefinition(ref t) if t == "load"));

        let err = catalog
            .calculate_max(&graph, &TimeRange::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingDefinition(_)));
    }

    #[test]
    fn calculate_max_returns_definition_maxima() {
        let (_data, catalog, _definition) = setup();
        let plugin = catalog.plugin(&Host::new("web01"), "df", None).unwrap();
        let graph = catalog.graph(&plugin, "df", None).unwrap();

        let values = catalog
            .calculate_max(&graph, &TimeRange::new("-1w", "now"))
            .unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["var"], 30.0);
    }
}
