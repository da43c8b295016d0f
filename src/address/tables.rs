//! Static lookup tables for Russian address abbreviations.
//!
//! All entries are lowercase. Matching code lowercases its input before
//! consulting these tables, so every lookup is case-insensitive.

/// Bumped whenever an entry is added, removed or re-mapped.
pub const TABLES_VERSION: u32 = 1;

// ─── Markers ────────────────────────────────────────────────────

/// Substrings that mark a region part (oblast, krai, republic).
pub const REGION_MARKERS: &[&str] = &["обл", "край", "респ"];

/// Substrings that disqualify a part from the known-settlement fallback.
pub const NON_SETTLEMENT_MARKERS: &[&str] = &["обл", "край", "ул", "пр-кт", "пер"];

/// Substrings that disqualify a part from being a house number.
pub const NON_HOUSE_MARKERS: &[&str] = &["обл", "край"];

// ─── Type prefixes ──────────────────────────────────────────────

/// Settlement-type abbreviations, anchored at the start of a part.
pub const SETTLEMENT_PREFIXES: &[&str] = &["г.", "с.", "п.", "пгт.", "рп.", "д."];

/// Street-type abbreviations, anchored at the start of a part.
pub const STREET_PREFIXES: &[&str] = &["ул.", "пр-кт.", "пер.", "ш.", "пр-д.", "пл.", "б-р."];

// ─── Known settlements ──────────────────────────────────────────

/// Canonical type of a known settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementKind {
    City,
    Village,
}

impl SettlementKind {
    /// Prefix prepended when a bare settlement name is rewritten.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::City => "г. ",
            Self::Village => "с. ",
        }
    }
}

pub struct KnownSettlement {
    pub name: &'static str,
    pub kind: SettlementKind,
}

/// Settlements recognised without a type prefix. Order is match priority.
pub const KNOWN_SETTLEMENTS: &[KnownSettlement] = &[
    KnownSettlement { name: "мамонтово", kind: SettlementKind::Village },
    KnownSettlement { name: "барнаул", kind: SettlementKind::City },
    KnownSettlement { name: "новосибирск", kind: SettlementKind::City },
    KnownSettlement { name: "красноярск", kind: SettlementKind::City },
];

// ─── Helpers ────────────────────────────────────────────────────

/// True if the lowercase form of `s` contains any of `markers`.
pub fn contains_any(s: &str, markers: &[&str]) -> bool {
    let lower = s.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

/// True if the lowercase form of `s` starts with any of `prefixes`.
pub fn starts_with_any(s: &str, prefixes: &[&str]) -> bool {
    let lower = s.to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p))
}

/// First known settlement whose name occurs in `s`.
pub fn known_settlement_in(s: &str) -> Option<&'static KnownSettlement> {
    let lower = s.to_lowercase();
    KNOWN_SETTLEMENTS.iter().find(|k| lower.contains(k.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_case_insensitive() {
        assert!(starts_with_any("Г. Барнаул", SETTLEMENT_PREFIXES));
        assert!(starts_with_any("УЛ. Ленина", STREET_PREFIXES));
        assert!(!starts_with_any("Барнаул г.", SETTLEMENT_PREFIXES));
    }

    #[test]
    fn test_pgt_is_not_shadowed() {
        // "пгт." must not be swallowed by the shorter "п." entry
        assert!(starts_with_any("пгт. Тальменка", SETTLEMENT_PREFIXES));
        assert!(!"пгт.".starts_with("п."));
    }

    #[test]
    fn test_known_settlement_kind() {
        let k = known_settlement_in("МАМОНТОВО").unwrap();
        assert_eq!(k.kind.prefix(), "с. ");
        let k = known_settlement_in("Барнаул").unwrap();
        assert_eq!(k.kind, SettlementKind::City);
        assert!(known_settlement_in("Бийск").is_none());
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("Новосибирская Обл", REGION_MARKERS));
        assert!(contains_any("Респ. Алтай", REGION_MARKERS));
        assert!(!contains_any("Россия", REGION_MARKERS));
    }
}
