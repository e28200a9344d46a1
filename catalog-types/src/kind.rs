//! Entity kinds of the catalog hierarchy.

use core::fmt;

/// The kind of catalog entity a lookup was looking for.
///
/// Carried by not-found errors so callers can match on what was missing
/// rather than on distinct error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    Host,
    Plugin,
    Graph,
    /// A backing round-robin file.
    File,
}

impl EntityKind {
    /// Returns the display label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Host => "Host",
            EntityKind::Plugin => "Plugin",
            EntityKind::Graph => "Graph",
            EntityKind::File => "File",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
