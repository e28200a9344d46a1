//! Hosts: the top-level directories of every data directory.

use std::collections::BTreeSet;
use std::fmt;

use collectd_catalog_types::EntityKind;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};

/// A monitored host, identified by its directory name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Host {
    name: String,
}

impl Host {
    /// A host called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The host directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same as [`Host::name`]; hosts carry no instance.
    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Path of the host directory relative to a data directory.
    pub fn path(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Catalog {
    /// Names of all hosts, merged across data directories.
    pub fn host_names(&self) -> Result<BTreeSet<String>> {
        Ok(self.scanner()?.list_subdirectories(&[""]).into_iter().collect())
    }

    /// All hosts, ordered by name.
    pub fn hosts(&self) -> Result<Vec<Host>> {
        Ok(self.host_names()?.into_iter().map(Host::new).collect())
    }

    /// The host called `name`.
    pub fn host(&self, name: &str) -> Result<Host> {
        if self.host_names()?.contains(name) {
            Ok(Host::new(name))
        } else {
            debug!("Unknown host {}", name);
            Err(CatalogError::not_found(EntityKind::Host, name))
        }
    }
}
