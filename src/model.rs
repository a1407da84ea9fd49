//! Character model types produced by the extraction engine.
//!
//! The whole model is built once per parse call and handed to the caller;
//! nothing here references module-level state or survives across calls.
//! All types serialize to camelCase JSON, matching the documented output
//! contract of the sheet format.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Canonical time units
// ============================================================================

pub const UNIT_PER_TURN: &str = "per-turn";
pub const UNIT_PER_BATTLE: &str = "per-battle";
pub const UNIT_PER_BATTLE_USES: &str = "per-battle-uses";
pub const UNIT_PER_HOUR: &str = "per-hour";

// ============================================================================
// Stats and bonuses
// ============================================================================

/// The three stat axes a character sheet describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Phys,
    Magic,
    Unique,
}

impl Stat {
    /// All axes, in classification priority order.
    pub const ALL: &'static [Stat] = &[Stat::Phys, Stat::Magic, Stat::Unique];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phys => "phys",
            Self::Magic => "magic",
            Self::Unique => "unique",
        }
    }
}

/// A signed contribution to one stat axis.
///
/// `value` may be negative (a penalty) or zero (a bare "possesses the
/// capability" declaration with no numeric modifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub value: i32,
    pub stat: Stat,
}

impl StatBonus {
    pub fn new(value: i32, stat: Stat) -> Self {
        Self { value, stat }
    }
}

/// Base stat triple read from the sheet's profile area.
///
/// Values are non-negative and default to 0 when the sheet never states them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub physical: u32,
    pub magic: u32,
    pub unique: u32,
}

// ============================================================================
// Timing
// ============================================================================

/// A value/unit pair for cooldowns, durations and usage limits.
///
/// Defaults to `{0, ""}` meaning "not stated". The canonical unit strings
/// are the `UNIT_*` constants in this module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParam {
    pub value: u32,
    pub unit: String,
}

impl TimeParam {
    pub fn new(value: u32, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    /// Whether the sheet actually stated this parameter.
    pub fn is_set(&self) -> bool {
        self.value > 0
    }
}

/// When/how an item activates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    /// Passively in effect at all times
    #[default]
    Always,
    /// Usable once per turn-like cadence (the item has a cooldown)
    Post,
    /// Fires when combat starts and persists as an aura
    CombatStart,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Post => "post",
            Self::CombatStart => "combat-start",
        }
    }
}

// ============================================================================
// Items and groups
// ============================================================================

/// One discrete ability or object extracted from the sheet.
///
/// `lore_text` and `mechanics_text` accumulate across the paragraphs that
/// belong to the item, newline-joined, in document order. `tags` and
/// `bonuses` are always present (possibly empty), never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub tags: IndexSet<String>,
    pub cooldown: TimeParam,
    pub duration: TimeParam,
    pub usage_limit: TimeParam,
    pub lore_text: String,
    pub mechanics_text: String,
    pub bonuses: Vec<StatBonus>,
    pub trigger: Trigger,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_ability_id: Option<String>,
}

impl Item {
    /// Create an item with all fields at their zero/empty defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            tags: IndexSet::new(),
            cooldown: TimeParam::default(),
            duration: TimeParam::default(),
            usage_limit: TimeParam::default(),
            lore_text: String::new(),
            mechanics_text: String::new(),
            bonuses: Vec::new(),
            trigger: Trigger::default(),
            is_blocked: false,
            trigger_ability_id: None,
        }
    }

    /// Append a flavor-text paragraph, newline-joined.
    pub fn push_lore(&mut self, paragraph: &str) {
        push_joined(&mut self.lore_text, paragraph);
    }

    /// Append a mechanics paragraph, newline-joined.
    pub fn push_mechanics(&mut self, paragraph: &str) {
        push_joined(&mut self.mechanics_text, paragraph);
    }
}

fn push_joined(buffer: &mut String, paragraph: &str) {
    if paragraph.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(paragraph);
}

/// Discriminant for the two kinds of ability groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Passive,
    Active,
}

/// A named bucket of items.
///
/// `abilities` is a one-time deep copy of `items` made at finalization.
/// Callers may mutate it independently without perturbing the canonical
/// list; it is a value copy, not a shared view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub kind: GroupKind,
    pub is_flaw_group: bool,
    pub items: Vec<Item>,
    pub abilities: Vec<Item>,
}

impl Group {
    pub fn new(name: impl Into<String>, kind: GroupKind, is_flaw_group: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            is_flaw_group,
            items: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Root model
// ============================================================================

/// Identity fields read from the sheet's profile area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Character name from the first title node; empty when absent
    pub name: String,
    pub level: u32,
    pub faction: String,
    /// Avatar image reference from the first captioned image; empty when absent
    pub avatar: String,
}

/// The three equipment buckets. Items parsed while in the equipment section
/// land in `usable`; the other buckets exist for downstream re-grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub usable: Vec<Item>,
    pub wearable: Vec<Item>,
    pub inventory: Vec<Item>,
}

/// Root output of the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterModel {
    pub id: String,
    pub profile: Profile,
    pub stats: Stats,
    pub passives: Vec<Group>,
    pub ability_groups: Vec<Group>,
    pub equipment: Equipment,
}

impl CharacterModel {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile: Profile::default(),
            stats: Stats::default(),
            passives: Vec::new(),
            ability_groups: Vec::new(),
            equipment: Equipment::default(),
        }
    }

    /// Serialize to a JSON value (camelCase keys), the shape consumers store.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for CharacterModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
