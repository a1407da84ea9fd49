//! Free-text extraction heuristics.
//!
//! Each extractor is a pure function over lower-cased text. Misses are never
//! errors: a pattern that does not match leaves the corresponding field at
//! its default, which is the dominant behavior for hand-authored sheets.

pub mod bonus_extractor;
pub mod profile_scanner;
pub mod tag_classifier;
pub mod time_extractor;

pub use bonus_extractor::{dedupe_bonuses, extract_bonuses};
pub use profile_scanner::scan_profile;
pub use tag_classifier::classify_tags;
pub use time_extractor::{extract_time_params, TimeParams};
