//! # collectd-catalog-types
//!
//! Core types for browsing a collectd RRD tree. collectd stores its data as
//!
//! ```text
//! <datadir>/<host>/<plugin>[-<plugin instance>]/<type>[-<type instance>].rrd
//! ```
//!
//! and this crate holds the pieces of that convention that do not touch the
//! filesystem: splitting a name into its primary part and instance, the
//! [`InstanceGroup`] that represents zero, one or many sibling instances, and
//! the [`EntityKind`] used to tag lookup failures.
//!
//! ## Features
//!
//! - `serde`: serialization of the value types via serde
//!
//! ## Example
//!
//! ```rust
//! use collectd_catalog_types::{naming, InstanceGroup};
//!
//! let (primary, instance) = naming::split("interface-eth0");
//! assert_eq!(primary, "interface");
//! assert_eq!(instance, Some("eth0"));
//!
//! let group = InstanceGroup::from_members(["eth0", "eth1"]);
//! assert!(group.is_group());
//! assert_eq!(group.suffix(), "");
//! ```

mod instance;
mod kind;
pub mod naming;

pub use instance::*;
pub use kind::*;

/// Instance token that selects the grouped view of a plugin.
pub const WILDCARD: &str = "*";

/// Extension of round-robin database files, without the dot.
pub const RRD_EXTENSION: &str = "rrd";
