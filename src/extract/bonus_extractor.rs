//! Stat Bonus Extraction
//!
//! Scans mechanics text for signed numeric stat adjustments ("+12", "-4")
//! and for bare capability declarations ("physical ability" with no number),
//! producing a deduplicated list of stat contributions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Stat, StatBonus};

/// Characters of surrounding context examined on each side of a signed number.
const CONTEXT_WINDOW: usize = 40;

/// Keyword root forms per stat axis. Substring match against the context
/// window, so "strengthens" and "bodily" count too.
const PHYS_KEYWORDS: &[&str] = &["physic", "strength", "body", "attack"];
const MAGIC_KEYWORDS: &[&str] = &["magic", "mana", "spell"];
const UNIQUE_KEYWORDS: &[&str] = &["unique", "special"];

static SIGNED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-]\d+").expect("Failed to compile signed number regex"));

/// Bare "possesses capability X" phrases, one per stat axis. Used only when
/// no signed number for that axis was found.
static PHYS_DECLARATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:physical|bodily)\s+(?:abilit|strength|damage|power|prowess)")
        .expect("Failed to compile physical declarative regex")
});
static MAGIC_DECLARATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:magical?|spell)\s+(?:abilit|strength|damage|power|casting)")
        .expect("Failed to compile magic declarative regex")
});
static UNIQUE_DECLARATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:unique|special)\s+(?:abilit|strength|damage|power|trait)")
        .expect("Failed to compile unique declarative regex")
});

/// Extract stat bonuses from one mechanics paragraph.
///
/// Every signed number is classified by the keywords in its surrounding
/// context window; numbers with no stat keyword nearby (cooldown counts,
/// dice, page references) are discarded. The result carries at most one
/// bonus per stat axis, highest absolute magnitude winning.
pub fn extract_bonuses(mechanics_text: &str) -> Vec<StatBonus> {
    let text = mechanics_text.to_lowercase();
    let mut candidates = Vec::new();

    for m in SIGNED_NUMBER.find_iter(&text) {
        let Ok(value) = m.as_str().parse::<i32>() else {
            tracing::trace!(matched = m.as_str(), "signed number out of range, skipped");
            continue;
        };
        let window = context_window(&text, m.start(), m.end());
        if let Some(stat) = classify_context(window) {
            candidates.push(StatBonus::new(value, stat));
        }
    }

    // Declarative fallback: a zero-value marker per axis that was mentioned
    // but never given a number, so consumers still see the axis is touched.
    for (stat, pattern) in [
        (Stat::Phys, &PHYS_DECLARATIVE),
        (Stat::Magic, &MAGIC_DECLARATIVE),
        (Stat::Unique, &UNIQUE_DECLARATIVE),
    ] {
        if candidates.iter().all(|b| b.stat != stat) && pattern.is_match(&text) {
            candidates.push(StatBonus::new(0, stat));
        }
    }

    dedupe_bonuses(candidates)
}

/// Keep one bonus per stat axis: sort by descending absolute value (stable,
/// so earlier candidates win ties) and drop later duplicates.
pub fn dedupe_bonuses(mut candidates: Vec<StatBonus>) -> Vec<StatBonus> {
    candidates.sort_by_key(|b| std::cmp::Reverse(b.value.abs()));
    let mut result: Vec<StatBonus> = Vec::new();
    for bonus in candidates {
        if result.iter().all(|kept| kept.stat != bonus.stat) {
            result.push(bonus);
        }
    }
    result
}

/// Classify a context window into a stat axis by keyword presence.
///
/// Priority order: physical (unless a magic keyword also appears in the
/// window), then magic, then unique. No keyword means the number is
/// ambiguous and gets discarded.
fn classify_context(window: &str) -> Option<Stat> {
    let has_phys = contains_any(window, PHYS_KEYWORDS);
    let has_magic = contains_any(window, MAGIC_KEYWORDS);
    if has_phys && !has_magic {
        Some(Stat::Phys)
    } else if has_magic {
        Some(Stat::Magic)
    } else if contains_any(window, UNIQUE_KEYWORDS) {
        Some(Stat::Unique)
    } else {
        None
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Symmetric context window around a match, clamped to char boundaries.
fn context_window(text: &str, start: usize, end: usize) -> &str {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}

// ============================================================================
// Tests
// ============================================================================
