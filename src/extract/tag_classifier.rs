//! Thematic Tag Classification
//!
//! Tests an item's combined name/lore/mechanics text against a fixed,
//! ordered list of keyword rules and produces a set of topic tags.

use indexmap::IndexSet;

/// Ordered tag rules: (tag, keyword substrings that trigger it).
///
/// Later rules never override earlier hits. Extend by appending new rules
/// at the end, never by reordering existing ones.
const TAG_RULES: &[(&str, &[&str])] = &[
    ("fire", &["fire", "flame", "burn", "ember"]),
    ("sword", &["sword", "blade", "saber"]),
    ("weapon", &["weapon", "axe", "spear", "bow", "dagger"]),
    ("demon", &["demon", "devil", "infernal", "fiend"]),
    ("necromancy", &["necroman", "undead", "corpse", "grave"]),
    ("defense", &["defense", "defence", "shield", "armor", "ward"]),
    ("healing", &["healing", "heal", "regenerat", "mend"]),
    ("illusion", &["illusion", "illusory", "phantasm", "mirage"]),
    ("mental", &["mental", "mind", "psychic", "hypno"]),
];

/// Classify an item into topic tags.
///
/// All three text fields are concatenated and lower-cased before matching;
/// the result is a set, so repeated hits cannot produce duplicates.
pub fn classify_tags(name: &str, lore_text: &str, mechanics_text: &str) -> IndexSet<String> {
    let haystack = format!("{} {} {}", name, lore_text, mechanics_text).to_lowercase();
    let mut tags = IndexSet::new();
    for (tag, needles) in TAG_RULES {
        if needles.iter().any(|needle| haystack.contains(needle)) {
            tags.insert((*tag).to_string());
        }
    }
    tags
}

// ============================================================================
// Tests
// ============================================================================
