//! Slot distribution.
//!
//! Walks a parsed tree, lifts every node carrying a `slot` attribute out of
//! its position and records its converted children under the normalized slot
//! name.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::keys::prop_key;
use crate::node::StructuralNode;
use crate::parser::parse_markup;

/// Attribute designating a node as slot content.
pub const SLOT_ATTRIBUTE: &str = "slot";

/// Content gathered for a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotContent {
    /// Every gathered child was text; values joined with a single space.
    Text(String),

    /// Structured content, kept as a fragment.
    Fragment(Vec<StructuralNode>),
}

impl SlotContent {
    /// Text value of a text slot.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Fragment(_) => None,
        }
    }

    /// Serialize the slot content as markup.
    pub fn to_html(&self) -> String {
        match self {
            Self::Text(value) => html_escape::encode_text(value).into_owned(),
            Self::Fragment(children) => children.iter().map(StructuralNode::to_html).collect(),
        }
    }
}

/// Slot name to slot content.
pub type SlotMap = BTreeMap<String, SlotContent>;

/// Result of a distribution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// The tree with all slotted nodes removed
    pub tree: StructuralNode,

    /// Content lifted out of the tree, keyed by normalized slot name
    pub slots: SlotMap,
}

/// Remove slotted nodes from a tree and collect them by slot name.
///
/// Text is trimmed, comments are dropped and the `slot` attribute never
/// survives into the output. Nested slots are recorded in the same map.
pub fn distribute_slots(root: &StructuralNode) -> Distribution {
    let mut distributor = Distributor::default();

    let tree = distributor
        .visit(root)
        .unwrap_or_else(|| StructuralNode::fragment(Vec::new()));

    Distribution {
        tree,
        slots: distributor.slots,
    }
}

/// Parse markup and distribute its slots in one pass.
///
/// Returns `None` when the markup produced no tree.
pub fn convert(markup: &str) -> Option<Distribution> {
    parse_markup(markup).map(|tree| distribute_slots(&tree))
}

#[derive(Debug, Default)]
struct Distributor {
    slots: SlotMap,
}

impl Distributor {
    fn visit(&mut self, node: &StructuralNode) -> Option<StructuralNode> {
        match node {
            StructuralNode::Text(value) => Some(StructuralNode::text(value.trim())),

            StructuralNode::Comment(_) => None,

            StructuralNode::Fragment { children } => {
                Some(StructuralNode::fragment(self.visit_children(children)))
            }

            StructuralNode::Element {
                tag,
                attributes,
                children,
            } => {
                let slot = attributes
                    .get(SLOT_ATTRIBUTE)
                    .map(|name| prop_key(name))
                    .filter(|name| !name.is_empty());

                let converted = self.visit_children(children);

                if let Some(name) = slot {
                    tracing::trace!("Moving <{}> into slot '{}'", tag, name);
                    self.slots.insert(name, gather(converted));
                    return None;
                }

                let mut attributes = attributes.clone();
                attributes.remove(SLOT_ATTRIBUTE);

                Some(StructuralNode::element(tag.as_str(), attributes, converted))
            }
        }
    }

    fn visit_children(&mut self, children: &[StructuralNode]) -> Vec<StructuralNode> {
        children
            .iter()
            .filter_map(|child| self.visit(child))
            .collect()
    }
}

fn gather(children: Vec<StructuralNode>) -> SlotContent {
    if !children.iter().all(StructuralNode::is_text) {
        return SlotContent::Fragment(children);
    }

    let text = children
        .iter()
        .filter_map(StructuralNode::text_value)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    SlotContent::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attributes;
    use pretty_assertions::assert_eq;

    fn distribute(markup: &str) -> Distribution {
        convert(markup).unwrap()
    }

    #[test]
    fn moves_slotted_nodes_into_slot_map() {
        let result = distribute(
            r#"<section><h1>testHeading</h1><em slot="testSlot">slotValue</em></section>"#,
        );

        assert_eq!(result.tree.to_html(), "<section><h1>testHeading</h1></section>");
        assert_eq!(
            result.slots,
            SlotMap::from([(
                "testSlot".to_string(),
                SlotContent::Text("slotValue".to_string())
            )])
        );
    }

    #[test]
    fn normalizes_slot_names() {
        for name in ["test-slot", "test_slot", "TestSlot", "Test slot"] {
            let result = distribute(&format!(r#"<p slot="{name}">value</p>"#));

            assert_eq!(
                result.slots.get("testSlot").and_then(SlotContent::as_text),
                Some("value"),
                "slot name {name:?}"
            );
            assert_eq!(result.tree.to_html(), "");
        }
    }

    #[test]
    fn structured_slot_content_becomes_fragment() {
        let result = distribute(r#"<div slot="footer"><b>bold</b> tail</div>"#);

        assert_eq!(
            result.slots["footer"],
            SlotContent::Fragment(vec![
                StructuralNode::element(
                    "b",
                    Attributes::new(),
                    vec![StructuralNode::text("bold")]
                ),
                StructuralNode::text("tail"),
            ])
        );
        assert_eq!(result.slots["footer"].to_html(), "<b>bold</b>tail");
    }

    #[test]
    fn nested_slots_share_one_map() {
        let result = distribute(
            r#"<div slot="outer"><span slot="inner">deep</span><i>kept</i></div><p>rest</p>"#,
        );

        assert_eq!(result.tree.to_html(), "<p>rest</p>");
        assert_eq!(result.slots["inner"], SlotContent::Text("deep".to_string()));
        assert_eq!(result.slots["outer"].to_html(), "<i>kept</i>");
    }

    #[test]
    fn later_slot_with_same_name_wins() {
        let result = distribute(r#"<b slot="x">first</b><b slot="x">second</b>"#);

        assert_eq!(result.slots.len(), 1);
        assert_eq!(result.slots["x"], SlotContent::Text("second".to_string()));
    }

    #[test]
    fn empty_slot_element_yields_empty_text() {
        let result = distribute(r#"<span slot="empty"></span>"#);

        assert_eq!(result.slots["empty"], SlotContent::Text(String::new()));
    }

    #[test]
    fn blank_slot_value_keeps_node_in_place() {
        let result = distribute(r#"<span slot=" " class="a">here</span>"#);

        assert!(result.slots.is_empty());
        assert_eq!(result.tree.to_html(), r#"<span class="a">here</span>"#);
    }

    #[test]
    fn trims_text_and_collapses_whitespace() {
        let result = distribute("    ");

        assert_eq!(
            result.tree,
            StructuralNode::fragment(vec![StructuralNode::text("")])
        );
        assert_eq!(result.tree.to_html(), "");
    }

    #[test]
    fn trims_text_inside_elements() {
        let result = distribute("<h1>  spaced  </h1>");

        assert_eq!(result.tree.to_html(), "<h1>spaced</h1>");
    }

    #[test]
    fn script_only_markup_renders_nothing() {
        let result = distribute("<script>alert('x')</script>");

        assert_eq!(result.tree, StructuralNode::fragment(vec![]));
        assert_eq!(result.tree.text_content(), "");
        assert!(result.slots.is_empty());
    }

    #[test]
    fn scripts_never_reach_slots() {
        let result = distribute(r#"<div slot="a">text<script>alert('x')</script></div>"#);

        assert_eq!(result.slots["a"], SlotContent::Text("text".to_string()));
    }

    #[test]
    fn comments_render_as_nothing() {
        let root = StructuralNode::fragment(vec![
            StructuralNode::Comment("ignored".to_string()),
            StructuralNode::text(" kept "),
        ]);

        let result = distribute_slots(&root);

        assert_eq!(
            result.tree,
            StructuralNode::fragment(vec![StructuralNode::text("kept")])
        );
    }

    #[test]
    fn multiple_text_children_join_with_space() {
        let mut attributes = Attributes::new();
        attributes.insert("slot".to_string(), "label".to_string());
        let root = StructuralNode::fragment(vec![StructuralNode::element(
            "span",
            attributes,
            vec![
                StructuralNode::text(" one "),
                StructuralNode::text("   "),
                StructuralNode::text("two"),
            ],
        )]);

        let result = distribute_slots(&root);

        assert_eq!(result.slots["label"], SlotContent::Text("one two".to_string()));
    }

    #[test]
    fn distribution_is_idempotent() {
        let markup = r#"<article><h2 slot="title">Title</h2><p>Body <b slot="badge">new</b></p></article>"#;
        let tree = parse_markup(markup).unwrap();

        let first = distribute_slots(&tree);
        let second = distribute_slots(&tree);

        assert_eq!(first, second);
        assert_eq!(first, convert(markup).unwrap());
    }

    #[test]
    fn empty_markup_converts_to_nothing() {
        assert_eq!(convert(""), None);
    }

    #[test]
    fn slotted_void_element_yields_empty_text() {
        let result = distribute(r#"<img slot="icon" src="a.png"><p>x</p>"#);

        assert_eq!(result.tree.to_html(), "<p>x</p>");
        assert_eq!(result.slots["icon"], SlotContent::Text(String::new()));
    }

    #[test]
    fn deeply_nested_markup_converts() {
        let markup = format!(r#"<em slot="label">found</em>{}x"#, "<span>".repeat(10_000));

        let result = distribute(&markup);

        assert_eq!(result.tree.text_content(), "x");
        assert_eq!(result.slots["label"], SlotContent::Text("found".to_string()));
    }
}
