//! Section/Group/Item Builder
//!
//! The structural heart of the engine: a single ordered pass over the
//! document's top-level nodes. Heading nodes switch between the three
//! sections (Passive, Active, Equipment) and open groups; blockquote nodes
//! open items; paragraph nodes are routed into the current item's lore or
//! mechanics text. Everything else is ignored.
//!
//! The lore/mechanics split is the single most fragile convention of the
//! sheet format: a paragraph containing at least one bold/strong run is
//! entirely mechanics, everything else is entirely lore. The rule is binary
//! on purpose; consumers rely on it.

use crate::extract::{extract_bonuses, extract_time_params};
use crate::html::{Element, Node};
use crate::model::{Equipment, Group, GroupKind, Item};

const HEADING_TAGS: &[&str] = &["cite", "h2", "h3", "h4"];
const ITEM_MARKER_TAG: &str = "blockquote";
const PARAGRAPH_TAG: &str = "p";
const BOLD_TAGS: &[&str] = &["b", "strong"];

const EQUIPMENT_KEYWORDS: &[&str] = &["equipment", "inventory", "belongings"];
/// Heading keywords that force a flaw group regardless of current section.
const FLAW_SECTION_KEYWORDS: &[&str] = &["debuff", "curse", "affliction", "injury"];
/// Keywords that merely flag an ordinary group as a flaw bucket.
const FLAW_GROUP_KEYWORDS: &[&str] = &["debuff", "minus", "penalt", "drawback"];

/// Name synthesized for items that appear before any group heading.
const DEFAULT_GROUP_NAME: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Passive,
    Active,
    Equipment,
}

/// Which group list a cursor points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupList {
    Passives,
    Actives,
}

/// Where the current item lives. Items and groups are append-only during
/// the walk, so indices stay valid until [`SheetBuilder::finish`].
#[derive(Debug, Clone, Copy)]
enum ItemSlot {
    None,
    Grouped { list: GroupList, group: usize },
    Equipment,
}

/// Walks top-level document nodes and accumulates groups, items and
/// equipment. There is no accept state; the result is whatever has been
/// gathered when the node list ends.
#[derive(Debug)]
pub struct SheetBuilder {
    section: Section,
    current_group: Option<(GroupList, usize)>,
    current_item: ItemSlot,
    passives: Vec<Group>,
    actives: Vec<Group>,
    equipment: Equipment,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self {
            section: Section::Passive,
            current_group: None,
            current_item: ItemSlot::None,
            passives: Vec::new(),
            actives: Vec::new(),
            equipment: Equipment::default(),
        }
    }

    /// Run the single ordered pass.
    pub fn walk(&mut self, nodes: &[Node]) {
        for node in nodes {
            let Node::Element(el) = node else { continue };
            if HEADING_TAGS.contains(&el.name.as_str()) {
                self.handle_heading(&el.text());
            } else if el.name == ITEM_MARKER_TAG {
                self.handle_item_marker(&el.text());
            } else if el.name == PARAGRAPH_TAG {
                self.handle_paragraph(el);
            }
            // Any other node type carries no structure
        }
    }

    /// Consume the builder, yielding (passives, actives, equipment).
    pub fn finish(self) -> (Vec<Group>, Vec<Group>, Equipment) {
        (self.passives, self.actives, self.equipment)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn handle_heading(&mut self, heading: &str) {
        let lowered = heading.to_lowercase();

        if lowered.contains("passive") {
            self.section = Section::Passive;
            self.current_group = None;
        } else if lowered.contains("active") {
            self.section = Section::Active;
            self.current_group = None;
        } else if contains_any(&lowered, EQUIPMENT_KEYWORDS) && !lowered.contains("debuff") {
            self.section = Section::Equipment;
            self.current_group = None;
        } else if contains_any(&lowered, FLAW_SECTION_KEYWORDS) {
            // A debuff heading forces a flaw group under passives no matter
            // which section the walk is currently in
            self.section = Section::Passive;
            self.open_group(heading, GroupList::Passives, true);
        } else if self.section != Section::Equipment {
            let is_flaw = contains_any(&lowered, FLAW_GROUP_KEYWORDS);
            let list = match self.section {
                Section::Passive => GroupList::Passives,
                Section::Active => GroupList::Actives,
                Section::Equipment => unreachable!("equipment handled above"),
            };
            self.open_group(heading, list, is_flaw);
        }
        // Equipment-section headings open no group; equipment is a flat list
    }

    fn handle_item_marker(&mut self, name: &str) {
        if self.section == Section::Equipment {
            self.equipment.usable.push(Item::new(name));
            self.current_item = ItemSlot::Equipment;
            return;
        }

        if self.current_group.is_none() {
            tracing::debug!(item = name, "item marker before any heading, opening default group");
            let list = match self.section {
                Section::Active => GroupList::Actives,
                _ => GroupList::Passives,
            };
            self.open_group(DEFAULT_GROUP_NAME, list, false);
        }

        if let Some((list, group)) = self.current_group {
            self.group_mut(list, group).items.push(Item::new(name));
            self.current_item = ItemSlot::Grouped { list, group };
        }
    }

    fn handle_paragraph(&mut self, el: &Element) {
        let text = el.text();
        if text.is_empty() {
            return;
        }
        let is_mechanics = el.has_descendant(BOLD_TAGS);

        // Extraction happens before the item lookup so the borrow of self
        // stays local to the mutation below
        let bonuses = if is_mechanics {
            extract_bonuses(&text)
        } else {
            Vec::new()
        };
        let times = extract_time_params(&text);
        let blocked = is_mechanics && text.to_lowercase().contains("blocked");

        let Some(item) = self.current_item_mut() else {
            tracing::debug!("paragraph before any item marker, ignored");
            return;
        };

        if is_mechanics {
            item.push_mechanics(&text);
            item.bonuses.extend(bonuses);
            // First stated value wins; later paragraphs never overwrite
            if !item.cooldown.is_set() && times.cooldown.is_set() {
                item.cooldown = times.cooldown;
            }
            if !item.duration.is_set() && times.duration.is_set() {
                item.duration = times.duration;
            }
            if !item.usage_limit.is_set() && times.usage_limit.is_set() {
                item.usage_limit = times.usage_limit;
            }
            if blocked {
                item.is_blocked = true;
            }
        } else {
            item.push_lore(&text);
        }
    }

    // ------------------------------------------------------------------
    // Cursor plumbing
    // ------------------------------------------------------------------

    fn open_group(&mut self, name: &str, list: GroupList, is_flaw: bool) {
        let kind = match list {
            GroupList::Passives => GroupKind::Passive,
            GroupList::Actives => GroupKind::Active,
        };
        let group = Group::new(name, kind, is_flaw);
        let target = self.list_mut(list);
        target.push(group);
        let index = target.len() - 1;
        self.current_group = Some((list, index));
    }

    fn list_mut(&mut self, list: GroupList) -> &mut Vec<Group> {
        match list {
            GroupList::Passives => &mut self.passives,
            GroupList::Actives => &mut self.actives,
        }
    }

    fn group_mut(&mut self, list: GroupList, index: usize) -> &mut Group {
        &mut self.list_mut(list)[index]
    }

    fn current_item_mut(&mut self) -> Option<&mut Item> {
        match self.current_item {
            ItemSlot::None => None,
            ItemSlot::Grouped { list, group } => self.group_mut(list, group).items.last_mut(),
            ItemSlot::Equipment => self.equipment.usable.last_mut(),
        }
    }
}

impl Default for SheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

// ============================================================================
// Tests
// ============================================================================
