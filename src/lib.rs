//! # collectd-catalog
//!
//! A read-only catalog over the round-robin database tree written by
//! collectd's `rrdtool` plugin.
//!
//! collectd lays its data out as `<DataDir>/<host>/<plugin>[-<instance>]/
//! <type>[-<instance>].rrd`, possibly spread over several data directories.
//! This crate turns that tree into a hierarchy of hosts, plugins and graphs,
//! folding numbered siblings such as `cpu-0` and `cpu-1` into one grouped
//! entry (`cpu-*`), and resolves every graph to the files that back it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Catalog                             │
//! │  ┌───────────┐    ┌──────────┐    ┌────────┐    ┌──────────┐ │
//! │  │ directory │───▶│   scan   │───▶│ model  │───▶│ resolve  │ │
//! │  │ (DataDir) │    │ (listing)│    │(H/P/G) │    │ (files)  │ │
//! │  └───────────┘    └──────────┘    └───┬────┘    └────┬─────┘ │
//! │                                       │              │       │
//! │                                       ▼              ▼       │
//! │                                  ┌────────┐    ┌──────────┐  │
//! │                                  │ query  │    │ generate │◀─ definition
//! │                                  └────────┘    └──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`directory`]**: data directories read from `collectd.conf`
//! - **[`scan`]**: merged, sorted listings across data directories
//! - **[`model`]**: [`Host`], [`Plugin`] and [`Graph`] with instance grouping
//! - **[`resolve`]**: the labelled files behind a graph
//! - **[`definition`]**: the [`GraphDefinition`] seam and JSON definition files
//! - **[`generate`]**: maxima and rendering, including percentage `upper`
//! - **[`query`]**: path-segment lookups for front-ends
//! - **[`settings`]**: application settings from file and environment
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use collectd_catalog::{Catalog, DataDirectoryIndex, EmptyRegistry};
//!
//! let catalog = Catalog::new(
//!     DataDirectoryIndex::from_directories(["/var/lib/collectd/rrd"]),
//!     Arc::new(EmptyRegistry),
//! );
//!
//! for graph in catalog.list_graphs("web01", "cpu-*")? {
//!     for source in catalog.graph_sources(&graph)? {
//!         println!("{} {}", source.label, source.path.display());
//!     }
//! }
//! # Ok::<(), collectd_catalog::CatalogError>(())
//! ```

pub mod catalog;
pub mod definition;
pub mod directory;
pub mod error;
pub mod generate;
pub mod model;
pub mod query;
pub mod resolve;
pub mod scan;
pub mod settings;

pub use catalog::Catalog;
pub use definition::{
    DefinitionFile, DefinitionSpec, EmptyRegistry, GraphDefinition, GraphRegistry, Maxima,
    PlanSource, RenderOptions, RenderPlan, StaticDefinition, TimeRange,
};
pub use directory::{DataDirectoryIndex, Directories};
pub use error::{CatalogError, Result};
pub use generate::{parse_percentage, scale_maximum, UPPER_OPTION};
pub use model::{Graph, Host, Plugin};
pub use query::PluginSelector;
pub use resolve::{GraphSource, PluginSource};
pub use scan::{CatalogScanner, ScanEntry};
pub use settings::Settings;

pub use collectd_catalog_types::{naming, EntityKind, InstanceGroup, WILDCARD};
