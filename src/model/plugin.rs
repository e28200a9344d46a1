//! Plugins: the `plugin[-instance]` directories of a host.

use std::fmt;

use collectd_catalog_types::{naming, EntityKind, InstanceGroup};
use tracing::debug;

use super::grouping::group_siblings;
use super::Host;
use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};

/// A plugin of a host, possibly standing for several instance directories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Plugin {
    host: Host,
    name: String,
    instance: InstanceGroup,
}

impl Plugin {
    /// A plugin of `host`; no directory is checked.
    pub fn new(host: Host, name: impl Into<String>, instance: InstanceGroup) -> Self {
        Self {
            host,
            name: name.into(),
            instance,
        }
    }

    /// The host the plugin belongs to.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// The primary name, without instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plugin instance, or the grouped instances.
    pub fn instance(&self) -> &InstanceGroup {
        &self.instance
    }

    /// `name-instance`, `name`, or `name-*` for a group.
    pub fn full_name(&self) -> String {
        match &self.instance {
            InstanceGroup::Group(_) => format!("{}-*", self.name),
            other => format!("{}{}", self.name, other.suffix()),
        }
    }

    /// `host/full_name`.
    pub fn title(&self) -> String {
        format!("{}/{}", self.host.full_name(), self.full_name())
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

impl Catalog {
    /// All plugins of `host`, with sibling instances grouped.
    pub fn plugins(&self, host: &Host) -> Result<Vec<Plugin>> {
        let dirs = self.scanner()?.list_subdirectories(&[host.path()]);
        Ok(group_siblings(dirs, |_| false)
            .into_iter()
            .map(|(name, instance)| Plugin::new(host.clone(), name, instance))
            .collect())
    }

    /// The plugin `name` of `host`.
    ///
    /// `instance` selects the entry: `None` the un-suffixed plugin, the
    /// wildcard `*` the grouped plugin, anything else the single instance.
    /// Once siblings are grouped, their instances are no longer reachable
    /// one by one.
    pub fn plugin(&self, host: &Host, name: &str, instance: Option<&str>) -> Result<Plugin> {
        self.plugins(host)?
            .into_iter()
            .find(|plugin| plugin.name == name && plugin.instance.matches(instance))
            .ok_or_else(|| {
                debug!("No plugin {:?} {:?} on {}", name, instance, host);
                CatalogError::not_found(EntityKind::Plugin, naming::join(name, instance))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture::{catalog, touch, FixtureRegistry};
    use collectd_catalog_types::WILDCARD;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog) {
        let data = TempDir::new().unwrap();
        touch(
            data.path(),
            &[
                "web01/db-a/queries.rrd",
                "web01/db-b/queries.rrd",
                "web01/interface-eth0/if_octets.rrd",
                "web01/load/load.rrd",
                "web01/.staging-x/load.rrd",
                "db01/cpu-0/cpu-idle.rrd",
            ],
        );
        let catalog = catalog(&[&data], FixtureRegistry::default());
        (data, catalog)
    }

    #[test]
    fn plugins_are_grouped() {
        let (_data, catalog) = setup();
        let plugins = catalog.plugins(&Host::new("web01")).unwrap();

        let names: Vec<String> = plugins.iter().map(Plugin::full_name).collect();
        assert_eq!(names, vec!["db-*", "interface-eth0", "load"]);
        assert_eq!(plugins[0].instance(), &InstanceGroup::from_members(["a", "b"]));
    }

    #[test]
    fn wildcard_lookup_returns_group() {
        let (_data, catalog) = setup();
        let host = Host::new("web01");

        let plugin = catalog.plugin(&host, "db", Some(WILDCARD)).unwrap();
        assert_eq!(plugin.instance(), &InstanceGroup::from_members(["a", "b"]));
        assert_eq!(plugin.title(), "web01/db-*");
    }

    #[test]
    fn grouped_instances_are_not_standalone() {
        let (_data, catalog) = setup();
        let err = catalog
            .plugin(&Host::new("web01"), "db", Some("a"))
            .unwrap_err();
        assert_eq!(err.missing_kind(), Some(EntityKind::Plugin));
        assert_eq!(err.to_string(), "Plugin db-a does not exist");
    }

    #[test]
    fn wildcard_never_matches_single() {
        let (_data, catalog) = setup();
        let host = Host::new("web01");
        assert!(catalog.plugin(&host, "interface", Some(WILDCARD)).is_err());
        assert_eq!(
            catalog.plugin(&host, "interface", Some("eth0")).unwrap().full_name(),
            "interface-eth0"
        );
    }

    #[test]
    fn absent_lookup() {
        let (_data, catalog) = setup();
        let host = Host::new("web01");
        assert_eq!(catalog.plugin(&host, "load", None).unwrap().full_name(), "load");

        let err = catalog.plugin(&host, "memory", None).unwrap_err();
        assert_eq!(err.to_string(), "Plugin memory does not exist");
    }

    #[test]
    fn unknown_host_has_no_plugins() {
        let (_data, catalog) = setup();
        assert!(catalog.plugins(&Host::new("mail01")).unwrap().is_empty());
    }
}
