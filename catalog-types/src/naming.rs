//! The `name[-instance]` naming convention.
//!
//! collectd names plugin directories `plugin[-plugin_instance]` and data files
//! `type[-type_instance].rrd`. The primary name never contains a `-`, so the
//! first `-` separates it from the instance; the instance may contain further
//! dashes (`df-var-log`).

use crate::RRD_EXTENSION;

/// Split `name` on its first `-` into `(primary, instance)`.
///
/// ```
/// use collectd_catalog_types::naming::split;
///
/// assert_eq!(split("cpu-0"), ("cpu", Some("0")));
/// assert_eq!(split("df-var-log"), ("df", Some("var-log")));
/// assert_eq!(split("load"), ("load", None));
/// ```
pub fn split(name: &str) -> (&str, Option<&str>) {
    let parts = pad_tuple(name.splitn(2, '-').map(Some).collect(), 2);
    (parts[0].unwrap_or_default(), parts[1])
}

/// Extend `values` with `None` markers until it holds at least `min_len` items.
///
/// Used to normalize one- or two-element splits to a fixed arity.
pub fn pad_tuple<T>(mut values: Vec<Option<T>>, min_len: usize) -> Vec<Option<T>> {
    if values.len() < min_len {
        values.resize_with(min_len, || None);
    }
    values
}

/// Rebuild a name from its primary part and optional instance.
pub fn join(primary: &str, instance: Option<&str>) -> String {
    match instance {
        Some(instance) => format!("{}-{}", primary, instance),
        None => primary.to_string(),
    }
}

/// Strip the extension (text after the last `.`) of a round-robin file name.
///
/// Returns `None` if the name does not end in `.rrd`.
pub fn strip_rrd_extension(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    (extension == RRD_EXTENSION).then_some(stem)
}

/// File name of a round-robin file for `stem` (`cpu-idle` → `cpu-idle.rrd`).
pub fn rrd_file_name(stem: &str) -> String {
    format!("{}.{}", stem, RRD_EXTENSION)
}
