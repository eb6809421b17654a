/*
    keys.rs - Reserved key names and naming-convention classification

    None of these names get special storage. They are ordinary entries whose
    meaning comes from the name alone:
    - _LAST_MODIFIED: bookkeeping timestamp maintained by the store
    - _CREATED: creation timestamp written by the owner
    - KPXC_BROWSER_*: browser-integration data
    - "Public Key: *": legacy browser-integration data
    - KnownBad: exclude-from-reports marker
*/

/// Sentinel key holding the last-modified timestamp.
pub const LAST_MODIFIED: &str = "_LAST_MODIFIED";

/// Key holding the creation timestamp.
pub const CREATED: &str = "_CREATED";

/// Prefix of keys written by the browser integration.
pub const BROWSER_KEY_PREFIX: &str = "KPXC_BROWSER_";

/// Prefix used by older browser-integration releases.
pub const BROWSER_LEGACY_KEY_PREFIX: &str = "Public Key: ";

/// Marker key excluding the owner from health reports.
pub const EXCLUDE_FROM_REPORTS: &str = "KnownBad";

/// Value stored under boolean marker keys.
pub const TRUE_VALUE: &str = "true";

pub fn is_browser_key(key: &str) -> bool {
    key.starts_with(BROWSER_KEY_PREFIX)
}

pub fn is_legacy_browser_key(key: &str) -> bool {
    key.starts_with(BROWSER_LEGACY_KEY_PREFIX)
}

/// Keys the store or its owner manage themselves.
pub fn is_reserved_key(key: &str) -> bool {
    key == LAST_MODIFIED || key == CREATED
}

/// Whether a value should be masked in views and left out of exports.
///
/// Prefix match on `_CREATED` is intentional: variants such as
/// `_CREATED_BY` fall under the same rule.
pub fn is_protected_key(key: &str) -> bool {
    is_browser_key(key) || key.starts_with(CREATED)
}
