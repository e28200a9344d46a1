//! Instance state of a plugin or graph.

use std::collections::BTreeSet;

use crate::WILDCARD;

/// The instance part of a plugin or graph name.
///
/// Siblings that share a primary name are collapsed into a single
/// [`InstanceGroup::Group`]; a lone instance stays [`InstanceGroup::Single`].
/// `Single` and `Group` describe the same slot, so a wildcard request only
/// ever matches a `Group`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "lowercase"))]
pub enum InstanceGroup {
    /// The name carries no `-instance` suffix.
    #[default]
    Absent,
    /// Exactly one instance.
    Single(String),
    /// Two or more sibling instances.
    Group(BTreeSet<String>),
}

impl InstanceGroup {
    /// Build the instance state for a set of sibling instances.
    ///
    /// No members gives `Absent`, one member gives `Single`, more give `Group`.
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: BTreeSet<String> = members.into_iter().map(Into::into).collect();
        match members.len() {
            0 => InstanceGroup::Absent,
            1 => match members.pop_first() {
                Some(member) => InstanceGroup::Single(member),
                None => InstanceGroup::Absent,
            },
            _ => InstanceGroup::Group(members),
        }
    }

    /// Whether the name has no instance suffix.
    pub fn is_absent(&self) -> bool {
        matches!(self, InstanceGroup::Absent)
    }

    /// Whether this is exactly one instance.
    pub fn is_single(&self) -> bool {
        matches!(self, InstanceGroup::Single(_))
    }

    /// Whether this stands for several sibling instances.
    pub fn is_group(&self) -> bool {
        matches!(self, InstanceGroup::Group(_))
    }

    /// The instance string of a `Single`.
    pub fn single(&self) -> Option<&str> {
        match self {
            InstanceGroup::Single(instance) => Some(instance),
            _ => None,
        }
    }

    /// The concrete instances this state stands for.
    ///
    /// Empty for `Absent`.
    pub fn members(&self) -> Vec<&str> {
        match self {
            InstanceGroup::Absent => Vec::new(),
            InstanceGroup::Single(instance) => vec![instance.as_str()],
            InstanceGroup::Group(members) => members.iter().map(String::as_str).collect(),
        }
    }

    /// The `-instance` name suffix of a single on-disk entry.
    ///
    /// Groups have no single entry, so their suffix is empty.
    pub fn suffix(&self) -> String {
        match self {
            InstanceGroup::Single(instance) => format!("-{}", instance),
            InstanceGroup::Absent | InstanceGroup::Group(_) => String::new(),
        }
    }

    /// Whether this state answers a lookup for `requested`.
    ///
    /// `None` matches `Absent`, the wildcard token matches any `Group`, any
    /// other string matches the `Single` with that instance.
    pub fn matches(&self, requested: Option<&str>) -> bool {
        match (self, requested) {
            (InstanceGroup::Absent, None) => true,
            (InstanceGroup::Group(_), Some(WILDCARD)) => true,
            (InstanceGroup::Single(instance), Some(requested)) => instance == requested,
            _ => false,
        }
    }

    /// Keep only the members starting with `prefix`.
    ///
    /// Returns `None` when nothing is left; a single survivor of a group
    /// becomes a `Single`. `Absent` never matches a prefix.
    pub fn narrow_to_prefix(&self, prefix: &str) -> Option<Self> {
        let kept: Vec<&str> = self
            .members()
            .into_iter()
            .filter(|member| member.starts_with(prefix))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(Self::from_members(kept))
        }
    }
}
