//! Full extraction test - end-to-end parse of realistic character sheets.

use sheetforge::model::{Stat, StatBonus, Trigger};
use sheetforge::{parse, SheetError};
use tracing_subscriber::EnvFilter;

/// Route engine breadcrumbs to the test harness; honors `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A representative hand-authored sheet exercising every section.
const FULL_SHEET: &str = r#"
<html><head><title>wiki export</title></head><body>
<h1>Kael the Unbroken</h1>
<figure><img src="kael.png"><figcaption>Kael</figcaption></figure>
<p>Level: 12. Faction: Iron Pact.</p>
<p>Physical characteristic: 14. Magic characteristic: 6. Unique characteristic: 2</p>

<h2>Passive abilities</h2>
<h3>Strength</h3>
<blockquote>Iron Skin</blockquote>
<p><b>Physical ability +15. Cooldown: 2 turns.</b></p>
<p>An ancient ward.</p>

<h3>Debuffs and curses</h3>
<blockquote>Old Wound</blockquote>
<p><b>Physical attack -3 in cold weather.</b></p>

<h2>Active abilities</h2>
<h3>Strikes</h3>
<blockquote>Heavy Blow</blockquote>
<p>A crushing overhead swing.</p>
<p><b>Physical attack +4. Recharge: 3. Usable 2 times per battle.</b></p>
<blockquote>Aura of Embers</blockquote>
<p><b>Burns nearby foes with magic flame, spell power +2.</b></p>

<h2>Equipment</h2>
<blockquote>Healing Draught</blockquote>
<p><b>Restores vigor. CD 1 battle.</b></p>
</body></html>
"#;

#[test]
fn test_full_sheet_profile_and_stats() {
    init_tracing();
    let model = parse(FULL_SHEET).expect("parse failed");

    assert_eq!(model.profile.name, "Kael the Unbroken");
    assert_eq!(model.profile.avatar, "kael.png");
    assert_eq!(model.profile.level, 12);
    assert_eq!(model.profile.faction, "Iron Pact");
    assert_eq!(model.stats.physical, 14);
    assert_eq!(model.stats.magic, 6);
    assert_eq!(model.stats.unique, 2);
}

#[test]
fn test_full_sheet_groups_and_items() {
    init_tracing();
    let model = parse(FULL_SHEET).expect("parse failed");

    assert_eq!(model.passives.len(), 2);
    assert_eq!(model.passives[0].name, "Strength");
    assert!(!model.passives[0].is_flaw_group);
    assert_eq!(model.passives[1].name, "Debuffs and curses");
    assert!(model.passives[1].is_flaw_group);

    assert_eq!(model.ability_groups.len(), 1);
    assert_eq!(model.ability_groups[0].name, "Strikes");
    assert_eq!(model.ability_groups[0].items.len(), 2);

    assert_eq!(model.equipment.usable.len(), 1);
    assert_eq!(model.equipment.usable[0].name, "Healing Draught");
}

#[test]
fn test_full_sheet_item_details() {
    init_tracing();
    let model = parse(FULL_SHEET).expect("parse failed");

    let iron_skin = &model.passives[0].items[0];
    assert_eq!(iron_skin.mechanics_text, "Physical ability +15. Cooldown: 2 turns.");
    assert_eq!(iron_skin.lore_text, "An ancient ward.");
    assert_eq!(iron_skin.bonuses, vec![StatBonus::new(15, Stat::Phys)]);
    assert_eq!(iron_skin.cooldown.value, 2);
    assert_eq!(iron_skin.cooldown.unit, "per-turn");
    assert_eq!(iron_skin.trigger, Trigger::Post);

    let old_wound = &model.passives[1].items[0];
    assert_eq!(old_wound.bonuses, vec![StatBonus::new(-3, Stat::Phys)]);
    assert_eq!(old_wound.trigger, Trigger::Always);

    let heavy_blow = &model.ability_groups[0].items[0];
    assert_eq!(heavy_blow.bonuses, vec![StatBonus::new(4, Stat::Phys)]);
    assert_eq!(heavy_blow.cooldown.value, 3);
    assert_eq!(heavy_blow.cooldown.unit, "per-turn");
    assert_eq!(heavy_blow.usage_limit.value, 2);
    assert_eq!(heavy_blow.usage_limit.unit, "per-battle");
    assert_eq!(heavy_blow.lore_text, "A crushing overhead swing.");

    let aura = &model.ability_groups[0].items[1];
    assert_eq!(aura.trigger, Trigger::CombatStart);
    assert_eq!(aura.duration.unit, "per-battle");
    assert!(aura.tags.contains("fire"));
    assert_eq!(aura.bonuses, vec![StatBonus::new(2, Stat::Magic)]);

    let draught = &model.equipment.usable[0];
    assert_eq!(draught.cooldown.value, 1);
    assert_eq!(draught.cooldown.unit, "per-battle-uses");
    assert!(draught.tags.contains("healing"));
}

#[test]
fn test_full_sheet_abilities_snapshot() {
    init_tracing();
    let mut model = parse(FULL_SHEET).expect("parse failed");
    for group in &model.passives {
        assert_eq!(group.abilities.len(), group.items.len());
    }
    // The snapshot is a value copy; mutating it leaves items untouched
    model.passives[0].abilities.clear();
    assert_eq!(model.passives[0].items.len(), 1);
}

#[test]
fn test_spec_scenario_minimal_passive_sheet() {
    init_tracing();
    let html = "<h2>Passive Abilities</h2><h3>Strength</h3>\
                <blockquote>Iron Skin</blockquote>\
                <p><b>Physical ability +15. Cooldown: 2 turns.</b></p>\
                <p>An ancient ward.</p>";
    let model = parse(html).expect("parse failed");

    assert_eq!(model.passives.len(), 1);
    assert_eq!(model.passives[0].name, "Strength");
    let item = &model.passives[0].items[0];
    assert_eq!(item.name, "Iron Skin");
    assert_eq!(item.bonuses, vec![StatBonus::new(15, Stat::Phys)]);
    assert_eq!(item.cooldown.value, 2);
    assert_eq!(item.cooldown.unit, "per-turn");
    assert_eq!(item.mechanics_text, "Physical ability +15. Cooldown: 2 turns.");
    assert_eq!(item.lore_text, "An ancient ward.");
    assert_eq!(item.trigger, Trigger::Post);
}

#[test]
fn test_sheet_without_item_markers_yields_empty_model() {
    init_tracing();
    let html = "<h1>Nameless</h1><h2>Passive abilities</h2><h3>Strength</h3><p>prose only</p>";
    let model = parse(html).expect("parse failed");

    assert!(model.passives.is_empty());
    assert!(model.ability_groups.is_empty());
    assert!(model.equipment.usable.is_empty());
    assert!(model.equipment.wearable.is_empty());
    assert!(model.equipment.inventory.is_empty());
    assert_eq!(model.stats.physical, 0);
    assert_eq!(model.stats.magic, 0);
    assert_eq!(model.stats.unique, 0);
}

#[test]
fn test_empty_input_is_an_error() {
    init_tracing();
    assert!(matches!(parse(""), Err(SheetError::EmptyDocument)));
    assert!(matches!(parse("   \n "), Err(SheetError::EmptyDocument)));
}

#[test]
fn test_unparseable_markup_is_an_error() {
    init_tracing();
    assert!(matches!(
        parse("<h1>Kael</h1><p"),
        Err(SheetError::MalformedDocument { .. })
    ));
}

#[test]
fn test_parse_is_idempotent_modulo_ids() {
    init_tracing();
    let first = strip_ids(parse(FULL_SHEET).expect("parse failed").to_json());
    let second = strip_ids(parse(FULL_SHEET).expect("parse failed").to_json());
    assert_eq!(first, second);
}

#[test]
fn test_model_serializes_and_deserializes() {
    init_tracing();
    let model = parse(FULL_SHEET).expect("parse failed");
    let json = serde_json::to_string(&model).expect("serialize");
    let back: sheetforge::CharacterModel = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.profile.name, model.profile.name);
    assert_eq!(back.passives.len(), model.passives.len());
}

fn strip_ids(mut value: serde_json::Value) -> serde_json::Value {
    fn walk(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                map.remove("id");
                for child in map.values_mut() {
                    walk(child);
                }
            }
            serde_json::Value::Array(items) => {
                for child in items {
                    walk(child);
                }
            }
            _ => {}
        }
    }
    walk(&mut value);
    value
}
