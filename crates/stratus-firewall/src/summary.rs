//! Open port summaries
//!
//! Presentational aggregation only: which ports or ranges do the rules
//! expose, regardless of who they are exposed to.

use std::collections::BTreeSet;
use stratus_core::{PermissionRule, SecurityGroup};

/// Render a rule's port range as `"22"` or `"80-90"`.
pub fn port_label(rule: &PermissionRule) -> String {
    if rule.is_single_port() {
        rule.from_port().to_string()
    } else {
        format!("{}-{}", rule.from_port(), rule.to_port())
    }
}

/// De-duplicated port labels in ascending lexical order.
pub fn summarize<'a, I>(rules: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a PermissionRule>,
{
    rules.into_iter().map(port_label).collect()
}

/// [`summarize`] over every rule of every group.
pub fn summarize_groups(groups: &[SecurityGroup]) -> BTreeSet<String> {
    summarize(groups.iter().flat_map(|group| group.rules.iter()))
}
