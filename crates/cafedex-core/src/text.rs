//! Name normalization and fuzzy similarity.
//!
//! Venue names mix Traditional Chinese with Latin text and full-width
//! punctuation, so everything here works per character and never strips
//! non-Latin scripts.

use std::collections::HashSet;

/// Suffixes stripped from venue names before matching.
///
/// Ordered longest-first so the most specific suffix wins; match
/// correctness depends on this iteration order. Standalone 咖啡 is not
/// listed (could be the entire name) and neither is standalone 店
/// (would damage branch names like 中山店).
const NOISE_SUFFIXES: [&str; 11] = [
    "咖啡蛋糕烘焙專賣店",
    "咖啡烘焙專賣店",
    "咖啡專賣店",
    "咖啡工作室",
    "咖啡館",
    "咖啡店",
    "咖啡廳",
    "門市",
    "分店",
    "coffee shop",
    "cafe",
];

/// Converts full-width ASCII (U+FF01..=U+FF5E) to half-width.
fn full_width_to_half(s: &str) -> String {
    s.chars()
        .map(|ch| match ch {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(ch as u32 - 0xFEE0).unwrap_or(ch)
            }
            ch => ch,
        })
        .collect()
}

/// Lowercase, fold width, and collapse whitespace runs to single
/// spaces. Shared by name normalization and chain detection.
pub(crate) fn fold_name(s: &str) -> String {
    full_width_to_half(s)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a venue name for fuzzy matching:
/// 1. Full-width -> half-width
/// 2. Lowercase
/// 3. Collapse whitespace + trim
/// 4. Strip at most one noise suffix, longest candidate first, and only
///    when the remainder is non-empty.
pub fn normalize_name(name: &str) -> String {
    let s = fold_name(name);

    for suffix in NOISE_SUFFIXES {
        if s.ends_with(suffix) && s.len() > suffix.len() {
            return s[..s.len() - suffix.len()].trim().to_string();
        }
    }

    s
}

/// Character-overlap similarity between two names, 0.0 to 1.0.
///
/// Sørensen-Dice coefficient on character sets after whitespace removal
/// and lowercasing. Tolerant of token reordering and subset containment
/// (a bare brand vs "brand + branch"), and safe for mixed CJK + Latin
/// names since it never tokenizes on word boundaries.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let strip = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };

    let na = strip(a);
    let nb = strip(b);

    if na == nb {
        return if na.is_empty() { 0.0 } else { 1.0 };
    }
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<char> = na.chars().collect();
    let set_b: HashSet<char> = nb.chars().collect();
    let intersection = set_a.intersection(&set_b).count();

    if intersection == 0 {
        return 0.0;
    }

    (2 * intersection) as f64 / (set_a.len() + set_b.len()) as f64
}
