use std::collections::{BTreeMap, BTreeSet};

use collectd_catalog_types::{naming, InstanceGroup};

/// Collapse sibling names into `(primary, instance)` entries.
///
/// A primary with two or more named instances becomes one `Group`, unless
/// `keep_separate` asks for one `Single` per instance. An un-suffixed name is
/// its own `Absent` entry. Entries come out ordered by primary, then instance.
pub(crate) fn group_siblings<I, F>(names: I, keep_separate: F) -> Vec<(String, InstanceGroup)>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut by_primary: BTreeMap<String, (bool, BTreeSet<String>)> = BTreeMap::new();
    for name in names {
        let (primary, instance) = naming::split(name.as_ref());
        let (absent, instances) = by_primary.entry(primary.to_string()).or_default();
        match instance {
            Some(instance) => {
                instances.insert(instance.to_string());
            }
            None => *absent = true,
        }
    }

    let mut grouped = Vec::new();
    for (primary, (absent, instances)) in by_primary {
        if absent {
            grouped.push((primary.clone(), InstanceGroup::Absent));
        }
        if instances.is_empty() {
            continue;
        }
        if keep_separate(&primary) {
            grouped.extend(
                instances
                    .into_iter()
                    .map(|instance| (primary.clone(), InstanceGroup::Single(instance))),
            );
        } else {
            grouped.push((primary, InstanceGroup::from_members(instances)));
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(s: &str) -> InstanceGroup {
        InstanceGroup::Single(s.to_string())
    }

    #[test]
    fn siblings_collapse_into_one_group() {
        let grouped = group_siblings(["db-a", "db-b", "load"], |_| false);
        assert_eq!(
            grouped,
            vec![
                ("db".to_string(), InstanceGroup::from_members(["a", "b"])),
                ("load".to_string(), InstanceGroup::Absent),
            ]
        );
    }

    #[test]
    fn lone_sibling_stays_single() {
        let grouped = group_siblings(["cpu-0"], |_| false);
        assert_eq!(grouped, vec![("cpu".to_string(), single("0"))]);
    }

    #[test]
    fn duplicates_across_directories_count_once() {
        let grouped = group_siblings(["cpu-0", "cpu-0"], |_| false);
        assert_eq!(grouped, vec![("cpu".to_string(), single("0"))]);
    }

    #[test]
    fn keep_separate_yields_singles() {
        let grouped = group_siblings(["disk-sda", "disk-sdb", "df-root", "df-var"], |p| {
            p == "disk"
        });
        assert_eq!(
            grouped,
            vec![
                ("df".to_string(), InstanceGroup::from_members(["root", "var"])),
                ("disk".to_string(), single("sda")),
                ("disk".to_string(), single("sdb")),
            ]
        );
    }

    #[test]
    fn absent_stays_beside_instances() {
        let grouped = group_siblings(["cpu", "cpu-0", "cpu-1"], |_| false);
        assert_eq!(
            grouped,
            vec![
                ("cpu".to_string(), InstanceGroup::Absent),
                ("cpu".to_string(), InstanceGroup::from_members(["0", "1"])),
            ]
        );
    }
}
