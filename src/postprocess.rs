//! Post-Processing
//!
//! Finalizes a freshly built model: drops empty groups, deduplicates the
//! bonuses accumulated across paragraphs, assigns tags and trigger
//! semantics, and snapshots each group's item list into its `abilities`
//! view.

use crate::extract::{classify_tags, dedupe_bonuses};
use crate::model::{CharacterModel, Item, Trigger, UNIT_PER_BATTLE};

/// Name keyword that marks an item as a persistent combat aura.
const AURA_KEYWORD: &str = "aura";

/// Finalize the model in place.
pub fn finalize(model: &mut CharacterModel) {
    model.passives.retain(|group| !group.is_empty());
    model.ability_groups.retain(|group| !group.is_empty());

    for group in model
        .passives
        .iter_mut()
        .chain(model.ability_groups.iter_mut())
    {
        for item in &mut group.items {
            finalize_item(item);
        }
        // Snapshot taken exactly once, after items are final. A value copy,
        // so later mutation of one list never perturbs the other.
        group.abilities = group.items.clone();
    }

    for item in model
        .equipment
        .usable
        .iter_mut()
        .chain(model.equipment.wearable.iter_mut())
        .chain(model.equipment.inventory.iter_mut())
    {
        finalize_item(item);
    }
}

fn finalize_item(item: &mut Item) {
    item.bonuses = dedupe_bonuses(std::mem::take(&mut item.bonuses));
    item.tags = classify_tags(&item.name, &item.lore_text, &item.mechanics_text);

    item.trigger = if item.cooldown.is_set() {
        Trigger::Post
    } else {
        Trigger::Always
    };

    if item.name.to_lowercase().contains(AURA_KEYWORD) {
        item.trigger = Trigger::CombatStart;
        if item.duration.unit.is_empty() {
            item.duration.unit = UNIT_PER_BATTLE.to_string();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
