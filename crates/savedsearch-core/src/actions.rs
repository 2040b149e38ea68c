//! Canonical form of comma-separated action lists.

/// Split on commas, trim, drop empties and duplicates, sort ascending and
/// rejoin.
pub fn normalize(raw: &str) -> String {
    let mut actions: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    actions.sort_unstable();
    actions.dedup();
    actions.join(",")
}

/// Two action lists are the same set when their canonical forms match.
pub fn equal_as_action_sets(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Exact membership test against the canonical set.
pub fn contains(raw: &str, action: &str) -> bool {
    raw.split(',').map(str::trim).any(|a| a == action)
}
