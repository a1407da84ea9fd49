//! Tolerant HTML document reader.
//!
//! Builds a minimal node tree (elements and text) from wiki/CMS-authored
//! HTML using an event-driven markup reader. Hand-authored sheets are messy:
//! void elements are never closed, close tags go missing or arrive out of
//! order, and entities are sometimes broken. All of that is absorbed here.
//! Only input that is not parseable markup at all becomes a hard error.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, SheetError};
use crate::text::normalize;

/// HTML elements that never open a nesting scope.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Container elements that merely wrap the sheet body.
const WRAPPER_TAGS: &[&str] = &["html", "body", "main", "article", "section", "div"];

// ============================================================================
// Node tree
// ============================================================================

/// One node of the parsed document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

/// An element node. Tag and attribute names are lower-cased during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Look up an attribute value by (lower-case) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated descendant text, whitespace-normalized.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(&self.children, &mut raw);
        normalize(Some(&raw))
    }

    /// Whether any descendant element has one of the given tag names.
    pub fn has_descendant(&self, tags: &[&str]) -> bool {
        self.children.iter().any(|node| match node {
            Node::Element(el) => tags.contains(&el.name.as_str()) || el.has_descendant(tags),
            Node::Text(_) => false,
        })
    }

    /// Depth-first search for the first descendant element with this tag.
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(el) = child {
                if el.name == tag {
                    return Some(el);
                }
                if let Some(found) = el.find_first(tag) {
                    return Some(found);
                }
            }
        }
        None
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => {
                out.push_str(t);
                out.push(' ');
            }
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Depth-first search over a node list for the first element with this tag.
pub fn find_first_in<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.name == tag {
                return Some(el);
            }
            if let Some(found) = el.find_first(tag) {
                return Some(found);
            }
        }
    }
    None
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse raw HTML into a node tree.
///
/// Lenient about the usual HTML looseness (see module docs); returns
/// [`SheetError::MalformedDocument`] only when the reader cannot make sense
/// of the markup syntax itself.
pub fn parse_fragment(html: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element = read_element(&start);
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    // Hand-authored sheets never close these
                    attach(&mut stack, &mut root, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Ok(Event::Empty(start)) => {
                let element = read_element(&start);
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_lowercase();
                close_element(&mut stack, &mut root, &name);
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map(|cow| cow.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(t.as_ref()).into_owned());
                if !text.trim().is_empty() {
                    attach(&mut stack, &mut root, Node::Text(text));
                }
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                if !text.trim().is_empty() {
                    attach(&mut stack, &mut root, Node::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            // Comments, processing instructions, doctypes
            Ok(_) => {}
            Err(err) => {
                return Err(SheetError::MalformedDocument {
                    position: reader.buffer_position() as usize,
                    reason: err.to_string(),
                });
            }
        }
    }

    // Unclosed elements at EOF attach to their parents as-is
    while let Some(element) = stack.pop() {
        attach(&mut stack, &mut root, Node::Element(element));
    }

    Ok(root)
}

/// Strip wrapper containers so callers see the sheet's structural content
/// as a flat node list in document order.
pub fn content_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut nodes = nodes;
    loop {
        let single_wrapper = matches!(
            nodes.as_slice(),
            [Node::Element(el)] if WRAPPER_TAGS.contains(&el.name.as_str())
        );
        if single_wrapper {
            if let Some(Node::Element(el)) = nodes.pop() {
                nodes = el.children;
                continue;
            }
        }
        // <html> unwraps to [head, body]; descend into the body
        if let Some(i) = nodes
            .iter()
            .position(|n| matches!(n, Node::Element(el) if el.name == "body"))
        {
            if let Node::Element(el) = nodes.swap_remove(i) {
                nodes = el.children;
                continue;
            }
        }
        break;
    }
    nodes
}

fn read_element(start: &quick_xml::events::BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
    let attrs = start
        .attributes()
        .with_checks(false)
        .filter_map(|attr| attr.ok())
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            let value = attr
                .unescape_value()
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect();
    Element {
        name,
        attrs,
        children: Vec::new(),
    }
}

fn attach(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Close the innermost open element with this name, folding anything opened
/// after it back into the tree. Stray close tags are ignored.
fn close_element(stack: &mut Vec<Element>, root: &mut Vec<Node>, name: &str) {
    let Some(pos) = stack.iter().rposition(|el| el.name == name) else {
        return;
    };
    while stack.len() > pos {
        if let Some(element) = stack.pop() {
            attach(stack, root, Node::Element(element));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Vec<Node> {
        parse_fragment(html).expect("parse failed")
    }

    #[test]
    fn test_simple_tree() {
        let nodes = parse("<p>hello <b>world</b></p>");
        assert_eq!(nodes.len(), 1);
        let p = nodes[0].as_element().expect("element");
        assert_eq!(p.name, "p");
        assert_eq!(p.text(), "hello world");
        assert!(p.has_descendant(&["b"]));
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let nodes = parse("<p>one<br>two</p><p>after</p>");
        assert_eq!(nodes.len(), 2);
        let first = nodes[0].as_element().expect("element");
        assert_eq!(first.text(), "one two");
    }

    #[test]
    fn test_unclosed_elements_survive() {
        let nodes = parse("<div><p>open ended");
        assert_eq!(nodes.len(), 1);
        let div = nodes[0].as_element().expect("element");
        assert_eq!(div.find_first("p").map(Element::text), Some("open ended".into()));
    }

    #[test]
    fn test_stray_close_tag_ignored() {
        let nodes = parse("</b><p>text</p>");
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_mismatched_close_folds_children() {
        // <b> is never closed; closing </p> folds it back into the paragraph
        let nodes = parse("<p><b>bold text</p>");
        let p = nodes[0].as_element().expect("element");
        assert!(p.has_descendant(&["b"]));
        assert_eq!(p.text(), "bold text");
    }

    #[test]
    fn test_attributes_lowercased() {
        let nodes = parse(r#"<img SRC="portrait.png" alt="x">"#);
        let img = nodes[0].as_element().expect("element");
        assert_eq!(img.attr("src"), Some("portrait.png"));
    }

    #[test]
    fn test_truncated_tag_is_hard_error() {
        let result = parse_fragment("<p");
        assert!(matches!(
            result,
            Err(SheetError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_content_nodes_unwraps_body() {
        let nodes = parse("<html><head><title>t</title></head><body><h1>Name</h1><p>x</p></body></html>");
        let content = content_nodes(nodes);
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].as_element().map(|e| e.name.as_str()), Some("h1"));
    }

    #[test]
    fn test_content_nodes_unwraps_nested_divs() {
        let nodes = parse("<div><div><h2>Passives</h2><p>x</p></div></div>");
        let content = content_nodes(nodes);
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn test_content_nodes_leaves_flat_list_alone() {
        let nodes = parse("<h1>Name</h1><blockquote>Item</blockquote>");
        let content = content_nodes(nodes);
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn test_broken_entity_kept_as_text() {
        let nodes = parse("<p>AT&T rules &nbsp; here</p>");
        let p = nodes[0].as_element().expect("element");
        assert!(p.text().contains("AT&T"));
    }

    #[test]
    fn test_find_first_in_document_order() {
        let nodes = parse("<div><figure><img src='a.png'></figure></div><img src='b.png'>");
        let img = find_first_in(&nodes, "img").expect("img");
        assert_eq!(img.attr("src"), Some("a.png"));
    }
}
