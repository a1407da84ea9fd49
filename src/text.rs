//! Text normalization helpers.
//!
//! Every component of the engine works on normalized text: whitespace runs
//! collapsed to single spaces, leading and trailing whitespace removed.

/// Collapse whitespace runs to single spaces and trim the result.
///
/// `None` yields an empty string. Never fails.
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}
