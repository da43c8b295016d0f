//! Geocoder query candidates, most specific first.

use super::types::AddressFragments;

/// Maximum number of candidates returned.
pub const MAX_CANDIDATES: usize = 8;

/// Candidates must be strictly longer than this (in characters).
const MIN_LEN_EXCLUSIVE: usize = 3;

/// Candidates must be strictly shorter than this (in characters).
const MAX_LEN_EXCLUSIVE: usize = 200;

/// The raw address is only offered when longer than this after stripping.
const RAW_MIN_LEN_EXCLUSIVE: usize = 10;

const COUNTRY_SUFFIX: &str = ", Россия";

/// Build the ordered, de-duplicated candidate list for `raw`.
///
/// Returns at most [`MAX_CANDIDATES`] strings, each 4..=199 characters.
/// An empty list is a valid result.
pub fn generate(raw: &str, f: &AddressFragments) -> Vec<String> {
    let region = f.region.as_deref();
    let settlement = f.settlement.as_deref();
    let street = f.street.as_deref();
    let house = f.house.as_deref();

    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: Option<String>| {
        if let Some(c) = candidate {
            if !out.contains(&c) {
                out.push(c);
            }
        }
    };

    let stripped = strip_country_suffix(raw);
    push((char_len(stripped) > RAW_MIN_LEN_EXCLUSIVE).then(|| stripped.to_string()));
    push(join(&[settlement, street, house]));
    push(join(&[region, settlement, street, house]));
    push(join(&[settlement, street]));
    push(join(&[street, settlement]));
    push(join(&[region, settlement, street]));
    push(join(&[settlement, house]));
    push(join(&[street, house]));
    push(join(&[settlement]));
    push(join(&[region, settlement]));
    push(join(&[street]));
    push(house.filter(|h| char_len(h) > 1).map(str::to_string));

    out.into_iter()
        .filter(|c| {
            let n = char_len(c);
            n > MIN_LEN_EXCLUSIVE && n < MAX_LEN_EXCLUSIVE
        })
        .take(MAX_CANDIDATES)
        .collect()
}

/// Join fragments with `", "`, or `None` if any is missing.
fn join(fields: &[Option<&str>]) -> Option<String> {
    let parts: Option<Vec<&str>> = fields.iter().copied().collect();
    parts.map(|p| p.join(", "))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Remove a trailing `", Россия"`, ignoring case.
fn strip_country_suffix(raw: &str) -> &str {
    let n = char_len(COUNTRY_SUFFIX);
    let Some((idx, _)) = raw.char_indices().rev().nth(n - 1) else {
        return raw;
    };
    if raw[idx..].to_lowercase() == COUNTRY_SUFFIX.to_lowercase() {
        &raw[..idx]
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::decompose;

    fn candidates(raw: &str) -> Vec<String> {
        generate(raw, &decompose(raw))
    }

    #[test]
    fn test_strip_country_suffix() {
        assert_eq!(strip_country_suffix("г. Барнаул, Россия"), "г. Барнаул");
        assert_eq!(strip_country_suffix("г. Барнаул, РОССИЯ"), "г. Барнаул");
        assert_eq!(strip_country_suffix("Россия, г. Барнаул"), "Россия, г. Барнаул");
        assert_eq!(strip_country_suffix("Россия"), "Россия");
        assert_eq!(strip_country_suffix(""), "");
    }

    #[test]
    fn test_scenario_fallback_settlement() {
        let raw = "Алтайский край, Мамонтово, ул. Советская, 10";
        let c = candidates(raw);
        assert_eq!(c[0], raw);
        assert_eq!(c[1], "с. Мамонтово, ул. Советская, 10");
        assert_eq!(c[2], "Алтайский край, с. Мамонтово, ул. Советская, 10");
        assert_eq!(c[3], "с. Мамонтово, ул. Советская");
        assert_eq!(c[4], "ул. Советская, с. Мамонтово");
        assert_eq!(c.len(), MAX_CANDIDATES);
    }

    #[test]
    fn test_raw_suffix_stripped() {
        let c = candidates("г. Мамонтово, ул. Ленина, 5, Алтайский край, Россия");
        assert_eq!(c[0], "г. Мамонтово, ул. Ленина, 5, Алтайский край");
        // No house: "5" is too short to survive splitting
        assert_eq!(c[1], "г. Мамонтово, ул. Ленина");
    }

    #[test]
    fn test_house_only_yields_nothing() {
        let f = decompose("12, Россия");
        assert_eq!(f.house.as_deref(), Some("12"));
        assert!(generate("12, Россия", &f).is_empty());
    }

    #[test]
    fn test_duplicates_dropped() {
        // Raw string equals the settlement+street+house join
        let raw = "г. Барнаул, ул. Мира, 15";
        let c = candidates(raw);
        assert_eq!(c[0], raw);
        assert_eq!(c[1], "г. Барнаул, ул. Мира");
        let mut sorted = c.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), c.len());
    }

    #[test]
    fn test_specific_before_single_fragments() {
        let f = AddressFragments {
            settlement: Some("г. Бийск".into()),
            street: Some("ул. Ленина".into()),
            house: Some("12".into()),
            ..Default::default()
        };
        let c = generate("x", &f);
        let pos = |s: &str| c.iter().position(|x| x == s).unwrap();
        let combined = pos("г. Бийск, ул. Ленина, 12");
        let settlement_alone = pos("г. Бийск");
        let street_alone = pos("ул. Ленина");
        assert!(combined < settlement_alone && combined < street_alone);
        assert_eq!(
            c,
            vec![
                "г. Бийск, ул. Ленина, 12",
                "г. Бийск, ул. Ленина",
                "ул. Ленина, г. Бийск",
                "г. Бийск, 12",
                "ул. Ленина, 12",
                "г. Бийск",
                "ул. Ленина",
            ]
        );
    }

    #[test]
    fn test_single_fragments_when_sparse() {
        let f = AddressFragments {
            settlement: Some("г. Барнаул".into()),
            street: Some("ул. Мира".into()),
            ..Default::default()
        };
        let c = generate("x", &f);
        assert_eq!(
            c,
            vec![
                "г. Барнаул, ул. Мира",
                "ул. Мира, г. Барнаул",
                "г. Барнаул",
                "ул. Мира",
            ]
        );
    }

    #[test]
    fn test_length_bounds() {
        let long_street = format!("ул. {}", "а".repeat(250));
        let f = AddressFragments {
            street: Some(long_street),
            house: Some("1234".into()),
            ..Default::default()
        };
        let c = generate("", &f);
        assert_eq!(c, vec!["1234"]);
        for raw in ["", "ab", "г. Барнаул, ул. Мира, 15, кв. 2, Россия"] {
            for cand in candidates(raw) {
                let n = cand.chars().count();
                assert!(n > 3 && n < 200, "{cand:?}");
            }
        }
    }

    #[test]
    fn test_length_filter_edges() {
        let street_only = |n: usize| AddressFragments {
            street: Some("а".repeat(n)),
            ..Default::default()
        };
        assert!(generate("", &street_only(3)).is_empty());
        assert_eq!(generate("", &street_only(4)), vec!["а".repeat(4)]);
        assert_eq!(generate("", &street_only(199)), vec!["а".repeat(199)]);
        assert!(generate("", &street_only(200)).is_empty());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let raw = "Красноярский край, Красноярск, пер. Тихий, 3";
        assert_eq!(candidates(raw), candidates(raw));
        assert!(candidates(raw).len() <= MAX_CANDIDATES);
    }
}
