//! Rule-driven decomposition of a raw address string.
//!
//! Each [`Rule`] fills one fragment slot. Rules run in table order; a rule
//! is skipped once its slot is filled, and within a rule the first matching
//! part wins. Two rules target the settlement slot: the prefix rule runs
//! first, so an explicitly typed settlement always beats the known-name
//! fallback.

use super::tables::{
    contains_any, known_settlement_in, starts_with_any, NON_HOUSE_MARKERS, NON_SETTLEMENT_MARKERS,
    REGION_MARKERS, SETTLEMENT_PREFIXES, STREET_PREFIXES,
};
use super::types::{AddressFragments, FragmentKind};
use tracing::trace;

/// A single predicate/transform over one comma-delimited part.
///
/// `apply` sees the fragments chosen by earlier rules and returns the value
/// to store, or `None` if the part does not qualify.
pub struct Rule {
    pub name: &'static str,
    pub kind: FragmentKind,
    pub apply: fn(&str, &AddressFragments) -> Option<String>,
}

pub const RULES: &[Rule] = &[
    Rule { name: "region-marker", kind: FragmentKind::Region, apply: region_marker },
    Rule { name: "settlement-prefix", kind: FragmentKind::Settlement, apply: settlement_prefix },
    Rule { name: "settlement-known-name", kind: FragmentKind::Settlement, apply: settlement_known_name },
    Rule { name: "street-prefix", kind: FragmentKind::Street, apply: street_prefix },
    Rule { name: "house-number", kind: FragmentKind::House, apply: house_number },
];

/// Split on commas, trim, and drop parts of one character or less.
pub fn split_parts(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| p.chars().count() > 1)
        .collect()
}

/// Decompose a raw address into typed fragments. Never fails.
pub fn decompose(raw: &str) -> AddressFragments {
    let parts = split_parts(raw);
    let mut fragments = AddressFragments::default();

    for rule in RULES {
        if fragments.get(rule.kind).is_some() {
            continue;
        }
        if let Some(value) = parts.iter().find_map(|p| (rule.apply)(p, &fragments)) {
            trace!(rule = rule.name, fragment = %rule.kind, value = %value, "rule matched");
            fragments.set(rule.kind, value);
        }
    }

    fragments
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

fn region_marker(part: &str, _: &AddressFragments) -> Option<String> {
    contains_any(part, REGION_MARKERS).then(|| part.to_string())
}

fn settlement_prefix(part: &str, _: &AddressFragments) -> Option<String> {
    starts_with_any(part, SETTLEMENT_PREFIXES).then(|| part.to_string())
}

fn settlement_known_name(part: &str, found: &AddressFragments) -> Option<String> {
    if part.chars().count() <= 2
        || contains_any(part, NON_SETTLEMENT_MARKERS)
        || has_digit(part)
        || found.region.as_deref() == Some(part)
    {
        return None;
    }
    let known = known_settlement_in(part)?;
    if starts_with_any(part, SETTLEMENT_PREFIXES) {
        Some(part.to_string())
    } else {
        Some(format!("{}{}", known.kind.prefix(), part))
    }
}

fn street_prefix(part: &str, _: &AddressFragments) -> Option<String> {
    starts_with_any(part, STREET_PREFIXES).then(|| part.to_string())
}

fn house_number(part: &str, _: &AddressFragments) -> Option<String> {
    let qualifies = has_digit(part)
        && !starts_with_any(part, SETTLEMENT_PREFIXES)
        && !starts_with_any(part, STREET_PREFIXES)
        && !contains_any(part, NON_HOUSE_MARKERS);
    qualifies.then(|| part.to_string())
}
