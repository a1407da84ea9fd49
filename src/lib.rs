//! Sheetforge - character-sheet extraction engine.
//!
//! Converts semi-structured, wiki-authored HTML character sheets into
//! strongly-typed [`CharacterModel`] records: profile and base stats,
//! passive and active ability groups, and equipment, with per-item stat
//! bonuses, timing parameters and topic tags recovered from free-form
//! prose.
//!
//! The engine is a single synchronous, side-effect-free transformation.
//! Malformed content degrades to defaults instead of failing; only input
//! that is not parseable markup at all yields an error.
//!
//! # Example
//!
//! ```
//! let html = "<h1>Kael</h1>\
//!             <h2>Passive abilities</h2><h3>Strength</h3>\
//!             <blockquote>Iron Skin</blockquote>\
//!             <p><b>Physical ability +15. Cooldown: 2 turns.</b></p>";
//! let model = sheetforge::parse(html).expect("valid markup");
//! assert_eq!(model.profile.name, "Kael");
//! assert_eq!(model.passives[0].items[0].cooldown.value, 2);
//! ```

pub mod builder;
pub mod error;
pub mod extract;
pub mod html;
pub mod model;
pub mod postprocess;
pub mod text;

pub use error::{Result, SheetError};
pub use model::CharacterModel;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Parse a raw HTML character sheet into a [`CharacterModel`].
///
/// One model per call; repeated calls over the same input produce
/// structurally equal models differing only in generated ids.
pub fn parse(html_input: &str) -> Result<CharacterModel> {
    let nodes = html::content_nodes(html::parse_fragment(html_input)?);
    if nodes.is_empty() {
        return Err(SheetError::EmptyDocument);
    }

    let mut model = CharacterModel::new();
    let (profile, stats) = extract::scan_profile(&nodes);
    model.profile = profile;
    model.stats = stats;

    let mut builder = builder::SheetBuilder::new();
    builder.walk(&nodes);
    let (passives, ability_groups, equipment) = builder.finish();
    model.passives = passives;
    model.ability_groups = ability_groups;
    model.equipment = equipment;

    postprocess::finalize(&mut model);

    tracing::debug!(
        name = %model.profile.name,
        passives = model.passives.len(),
        actives = model.ability_groups.len(),
        equipment = model.equipment.usable.len(),
        "parsed character sheet"
    );
    Ok(model)
}
