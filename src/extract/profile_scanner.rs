//! Profile and Base-Stat Scanning
//!
//! Reads the identity fields and the base stat triple out of the document:
//! the first `h1` supplies the character name, the first image inside a
//! figure/caption wrapper supplies the avatar, and free-form phrases in the
//! plain text ("physical characteristic: 12", "level: 5", "faction: ...")
//! fill the rest. First match per field wins; misses leave defaults.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::html::{find_first_in, Node};
use crate::model::{Profile, Stats};
use crate::text::normalize;

/// Elements that wrap a captioned avatar image.
const CAPTION_WRAPPER_TAGS: &[&str] = &["figure", "figcaption", "caption"];

/// "physical characteristic: 12", "magic: +8", "unique stat 3"
static STAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(physical|magic(?:al)?|unique)(?:\s+characteristics?|\s+stats?)?\s*:?\s*\+?(\d+)",
    )
    .expect("Failed to compile stat phrase regex")
});

static LEVEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\blevel\s*:?\s*(\d+)").expect("Failed to compile level regex")
});

static FACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfaction\s*:\s*([^.,;:\n]+)").expect("Failed to compile faction regex")
});

/// Scan the document's top-level nodes for profile fields and base stats.
pub fn scan_profile(nodes: &[Node]) -> (Profile, Stats) {
    let mut profile = Profile::default();

    if let Some(title) = find_first_in(nodes, "h1") {
        profile.name = title.text();
    }
    if let Some(avatar) = find_avatar(nodes) {
        profile.avatar = avatar;
    }

    let text = document_text(nodes);

    if let Some(level) = LEVEL_PATTERN
        .captures(&text)
        .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
    {
        profile.level = level;
    }
    if let Some(m) = FACTION_PATTERN.captures(&text).and_then(|caps| caps.get(1)) {
        profile.faction = normalize(Some(m.as_str()));
    }

    (profile, scan_stats(&text))
}

/// First match per stat axis wins, even an explicit 0; axes never stated
/// stay 0.
fn scan_stats(text: &str) -> Stats {
    let mut physical: Option<u32> = None;
    let mut magic: Option<u32> = None;
    let mut unique: Option<u32> = None;

    for caps in STAT_PATTERN.captures_iter(text) {
        let (Some(keyword), Some(number)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(value) = number.as_str().parse::<u32>() else {
            continue;
        };
        let keyword = keyword.as_str().to_lowercase();
        let slot = if keyword.starts_with("phys") {
            &mut physical
        } else if keyword.starts_with("magic") {
            &mut magic
        } else {
            &mut unique
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    Stats {
        physical: physical.unwrap_or(0),
        magic: magic.unwrap_or(0),
        unique: unique.unwrap_or(0),
    }
}

/// First image reference inside a caption-like wrapper, in document order.
fn find_avatar(nodes: &[Node]) -> Option<String> {
    for node in nodes {
        let Node::Element(el) = node else { continue };
        if CAPTION_WRAPPER_TAGS.contains(&el.name.as_str()) {
            if let Some(src) = el.find_first("img").and_then(|img| img.attr("src")) {
                return Some(src.to_string());
            }
        }
        if let Some(found) = find_avatar(&el.children) {
            return Some(found);
        }
    }
    None
}

/// Plain text of the whole document, one line per top-level node.
fn document_text(nodes: &[Node]) -> String {
    let mut lines = Vec::new();
    for node in nodes {
        let line = match node {
            Node::Element(el) => el.text(),
            Node::Text(t) => normalize(Some(t)),
        };
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================
