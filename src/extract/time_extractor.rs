//! Time-Parameter Extraction
//!
//! Scans mechanics text for cooldown, duration and usage-limit phrases and
//! extracts a value plus canonical unit. Only the first match of each kind
//! is honored; several cooldown phrases in one paragraph are never summed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{
    TimeParam, UNIT_PER_BATTLE, UNIT_PER_BATTLE_USES, UNIT_PER_HOUR, UNIT_PER_TURN,
};

/// Cooldown phrases: "cooldown: 3", "CD 2 turns", "recharge - 5", "recovery time: 1 hour"
static COOLDOWN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:cooldown|\bcd\b|recharge|recovery\s+time)[\s:.,\-]*(\d+)\s*([a-z]+)?")
        .expect("Failed to compile cooldown regex")
});

/// Duration phrases: "duration: 2 turns", "time active - 1 battle"
static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:duration|time\s+active)[\s:.,\-]*(\d+)\s*([a-z]+)?")
        .expect("Failed to compile duration regex")
});

/// Usage-limit phrases: "2 uses per battle", "usable 3 times per battle"
static USAGE_LIMIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(?:uses?|times?)\s*(?:per|a)\s*battle")
        .expect("Failed to compile usage limit regex")
});

/// Timing parameters found in one stretch of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeParams {
    pub cooldown: TimeParam,
    pub duration: TimeParam,
    pub usage_limit: TimeParam,
}

/// Extract cooldown, duration and usage limit from free text.
///
/// Every field defaults to `{0, ""}` when its phrase is absent.
pub fn extract_time_params(text: &str) -> TimeParams {
    let text = text.to_lowercase();
    let mut params = TimeParams::default();

    if let Some((value, unit)) = first_match(&COOLDOWN_PATTERN, &text) {
        params.cooldown = TimeParam::new(value, cooldown_unit(unit.as_deref()));
    }
    if let Some((value, unit)) = first_match(&DURATION_PATTERN, &text) {
        params.duration = TimeParam::new(value, duration_unit(unit.as_deref()));
    }
    if let Some(caps) = USAGE_LIMIT_PATTERN.captures(&text) {
        if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
            params.usage_limit = TimeParam::new(value, UNIT_PER_BATTLE);
        }
    }

    params
}

fn first_match(pattern: &Regex, text: &str) -> Option<(u32, Option<String>)> {
    let caps = pattern.captures(text)?;
    let value = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_string());
    Some((value, unit))
}

/// Map a trailing unit word onto a canonical cooldown unit by prefix.
/// Absent or unrecognized words fall back to per-turn.
fn cooldown_unit(word: Option<&str>) -> &'static str {
    match word {
        Some(w) if w.starts_with("battle") || w.starts_with("use") || w.starts_with("fight") => {
            UNIT_PER_BATTLE_USES
        }
        Some(w) if w.starts_with("hour") => UNIT_PER_HOUR,
        _ => UNIT_PER_TURN,
    }
}

fn duration_unit(word: Option<&str>) -> &'static str {
    match word {
        Some(w) if w.starts_with("battle") || w.starts_with("fight") => UNIT_PER_BATTLE,
        _ => UNIT_PER_TURN,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Cooldown: 2 turns.", 2, UNIT_PER_TURN)]
    #[case("recharge: 3", 3, UNIT_PER_TURN)]
    #[case("CD 4 battles", 4, UNIT_PER_BATTLE_USES)]
    #[case("Recovery time - 1 hour", 1, UNIT_PER_HOUR)]
    #[case("cooldown 5 uses", 5, UNIT_PER_BATTLE_USES)]
    fn test_cooldown_phrases(#[case] text: &str, #[case] value: u32, #[case] unit: &str) {
        let params = extract_time_params(text);
        assert_eq!(params.cooldown, TimeParam::new(value, unit));
    }

    #[rstest]
    #[case("Duration: 3 turns", 3, UNIT_PER_TURN)]
    #[case("time active: 1 battle", 1, UNIT_PER_BATTLE)]
    #[case("duration 2", 2, UNIT_PER_TURN)]
    fn test_duration_phrases(#[case] text: &str, #[case] value: u32, #[case] unit: &str) {
        let params = extract_time_params(text);
        assert_eq!(params.duration, TimeParam::new(value, unit));
    }

    #[test]
    fn test_usage_limit_phrase() {
        let params = extract_time_params("Usable 2 times per battle.");
        assert_eq!(params.usage_limit, TimeParam::new(2, UNIT_PER_BATTLE));

        let params = extract_time_params("3 uses per battle");
        assert_eq!(params.usage_limit, TimeParam::new(3, UNIT_PER_BATTLE));
    }

    #[test]
    fn test_unknown_unit_word_defaults_to_per_turn() {
        let params = extract_time_params("cooldown: 6 rounds of combat");
        assert_eq!(params.cooldown, TimeParam::new(6, UNIT_PER_TURN));
    }

    #[test]
    fn test_first_cooldown_wins_not_summed() {
        let params = extract_time_params("Cooldown: 2 turns. Second form cooldown: 9 turns.");
        assert_eq!(params.cooldown.value, 2);
    }

    #[test]
    fn test_independent_scans() {
        let params = extract_time_params("Duration: 3 turns, cooldown: 5 turns.");
        assert_eq!(params.cooldown.value, 5);
        assert_eq!(params.duration.value, 3);
    }

    #[test]
    fn test_cd_requires_word_boundary() {
        // "cd" inside another word must not trigger a cooldown
        let params = extract_time_params("the acdc 3 amulet");
        assert_eq!(params.cooldown, TimeParam::default());
    }

    #[test]
    fn test_no_match_leaves_defaults() {
        let params = extract_time_params("Just flavor text with no timing at all.");
        assert_eq!(params, TimeParams::default());
    }

    #[test]
    fn test_trigger_word_without_number_is_a_miss() {
        let params = extract_time_params("recharges slowly over time");
        assert_eq!(params.cooldown, TimeParam::default());
    }
}
