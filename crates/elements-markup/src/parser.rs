//! Lenient markup parser.
//!
//! Markup is parsed with html5ever's HTML5 tree builder, so malformed input is
//! recovered the same way a browser would recover it. Scripts never make it
//! into the resulting tree.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;

use crate::node::{is_void_element, Attributes, StructuralNode};
use crate::sink::{Arena, ArenaSink, NodeData, DOCUMENT};

/// Deepest element nesting kept in the tree.
///
/// Nodes nested deeper are attached, in document order, to the ancestor at
/// this depth, the same way browsers cap their parser's tree depth.
pub const MAX_DEPTH: usize = 512;

/// Parse the inner markup of a host element into a structural tree.
///
/// The result is always a [`StructuralNode::Fragment`] whose children are the
/// top-level nodes of the markup. Returns `None` when there is nothing to parse.
pub fn parse_markup(markup: &str) -> Option<StructuralNode> {
    if markup.is_empty() {
        return None;
    }

    // Parsed like a DOMParser document, which never runs scripts
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let document = format!("<!DOCTYPE html>\n<html><body>{markup}</body></html>");
    let arena = html5ever::parse_document(ArenaSink::new(), opts).one(document);

    let Some(body) = arena.find_element(DOCUMENT, "body") else {
        tracing::debug!("Parsed document has no body, nothing to render");
        return None;
    };

    Some(StructuralNode::fragment(convert_children(&arena, body, 1)))
}

/// Convert the children of `parent`, which sit at `depth`.
fn convert_children(arena: &Arena, parent: usize, depth: usize) -> Vec<StructuralNode> {
    if depth > MAX_DEPTH {
        return flatten_descendants(arena, parent);
    }

    arena
        .node(parent)
        .children
        .iter()
        .filter_map(|child| convert_node(arena, *child, depth))
        .collect()
}

fn convert_node(arena: &Arena, id: usize, depth: usize) -> Option<StructuralNode> {
    let (mut node, content) = convert_shallow(arena, id)?;

    if let Some(content) = content {
        set_children(&mut node, convert_children(arena, content, depth + 1));
    }

    Some(node)
}

/// Every node below `parent` as a flat list, in document order.
fn flatten_descendants(arena: &Arena, parent: usize) -> Vec<StructuralNode> {
    let mut flat = Vec::new();
    let mut stack: Vec<usize> = arena.node(parent).children.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        let Some((node, content)) = convert_shallow(arena, id) else {
            continue;
        };
        if let Some(content) = content {
            stack.extend(arena.node(content).children.iter().rev());
        }
        flat.push(node);
    }

    tracing::trace!("Flattened {} nodes nested deeper than {}", flat.len(), MAX_DEPTH);
    flat
}

/// Convert a node without its children.
///
/// Also returns the arena node whose children belong to the converted node.
/// Returns `None` for nodes that are dropped along with their subtree.
fn convert_shallow(arena: &Arena, id: usize) -> Option<(StructuralNode, Option<usize>)> {
    match &arena.node(id).data {
        NodeData::Text(value) => Some((StructuralNode::Text(value.clone()), None)),
        NodeData::Comment(value) => Some((StructuralNode::Comment(value.clone()), None)),
        NodeData::Document => Some((StructuralNode::fragment(Vec::new()), Some(id))),
        NodeData::Element {
            name,
            attrs,
            template_contents,
        } => {
            let tag: &str = &name.local;

            if tag.eq_ignore_ascii_case("script") {
                tracing::trace!("Dropping <script> from markup");
                return None;
            }

            let attributes: Attributes = attrs.iter().cloned().collect();
            let element = StructuralNode::element(tag, attributes, Vec::new());

            if is_void_element(tag) {
                Some((element, None))
            } else {
                Some((element, Some(template_contents.unwrap_or(id))))
            }
        }
    }
}

fn set_children(node: &mut StructuralNode, converted: Vec<StructuralNode>) {
    match node {
        StructuralNode::Fragment { children } | StructuralNode::Element { children, .. } => {
            *children = converted;
        }
        StructuralNode::Text(_) | StructuralNode::Comment(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_nested_markup() {
        let tree = parse_markup(
            r#"<h1>testHeading</h1><br /><section><h2 title="Main Title">Hello</h2></section>"#,
        )
        .unwrap();

        assert_eq!(
            tree,
            StructuralNode::fragment(vec![
                StructuralNode::element(
                    "h1",
                    Attributes::new(),
                    vec![StructuralNode::text("testHeading")]
                ),
                StructuralNode::element("br", Attributes::new(), vec![]),
                StructuralNode::element(
                    "section",
                    Attributes::new(),
                    vec![StructuralNode::element(
                        "h2",
                        attrs(&[("title", "Main Title")]),
                        vec![StructuralNode::text("Hello")]
                    )]
                ),
            ])
        );
    }

    #[test]
    fn recovers_unclosed_tags() {
        let tree = parse_markup("<h1>testText").unwrap();

        assert_eq!(tree.to_html(), "<h1>testText</h1>");
    }

    #[test]
    fn recovers_misnested_tags() {
        let tree = parse_markup("<p><b>bold<i>both</b>italic</i></p>").unwrap();

        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.children()[0].tag(), Some("p"));
        assert_eq!(tree.text_content(), "boldbothitalic");
    }

    #[test]
    fn drops_scripts_and_their_content() {
        let tree = parse_markup("<div>safe<script>alert('danger')</script></div>").unwrap();

        assert_eq!(tree.to_html(), "<div>safe</div>");
        assert!(!tree.text_content().contains("danger"));
    }

    #[test]
    fn drops_scripts_regardless_of_case() {
        let tree = parse_markup("<SCRIPT type=\"text/javascript\">alert('x')</SCRIPT>").unwrap();

        assert_eq!(tree, StructuralNode::fragment(vec![]));
    }

    #[test]
    fn preserves_whitespace_text() {
        let tree = parse_markup("    ").unwrap();

        assert_eq!(
            tree,
            StructuralNode::fragment(vec![StructuralNode::text("    ")])
        );
    }

    #[test]
    fn void_elements_have_no_children() {
        let tree = parse_markup(r#"<img src="a.png" alt="A">after"#).unwrap();

        assert_eq!(
            tree.children()[0],
            StructuralNode::element("img", attrs(&[("alt", "A"), ("src", "a.png")]), vec![])
        );
        assert_eq!(tree.children()[1], StructuralNode::text("after"));
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let first = parse_markup(r#"<a href="/x" title="X" data-id="1">x</a>"#).unwrap();
        let second = parse_markup(r#"<a data-id="1" title="X" href="/x">x</a>"#).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn keeps_comments_as_foreign_nodes() {
        let tree = parse_markup("<!-- note --><p>text</p>").unwrap();

        assert_eq!(tree.children()[0], StructuralNode::Comment(" note ".to_string()));
        assert_eq!(tree.to_html(), "<p>text</p>");
    }

    #[test]
    fn template_content_becomes_children() {
        let tree = parse_markup("<template><span>inner</span></template>").unwrap();

        assert_eq!(tree.children()[0].tag(), Some("template"));
        assert_eq!(tree.children()[0].children()[0].tag(), Some("span"));
    }

    #[test]
    fn decodes_entities() {
        let tree = parse_markup("<p>a &amp; b</p>").unwrap();

        assert_eq!(tree.text_content(), "a & b");
    }

    #[test]
    fn empty_markup_is_no_tree() {
        assert_eq!(parse_markup(""), None);
    }

    #[test]
    fn parses_noscript_content_as_markup() {
        let tree = parse_markup("<noscript><p>x</p></noscript>").unwrap();

        let noscript = &tree.children()[0];
        assert_eq!(noscript.tag(), Some("noscript"));
        assert_eq!(noscript.children()[0].tag(), Some("p"));
        assert_eq!(tree.to_html(), "<noscript><p>x</p></noscript>");
    }

    fn depth(node: &StructuralNode) -> usize {
        node.children()
            .iter()
            .map(|child| depth(child) + 1)
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn caps_nesting_depth() {
        let markup = format!("{}deep", "<span>".repeat(10_000));

        let tree = parse_markup(&markup).unwrap();

        assert_eq!(depth(&tree), MAX_DEPTH + 1);
        assert_eq!(tree.text_content(), "deep");
    }

    #[test]
    fn shallow_markup_is_not_flattened() {
        let markup = format!("{}x{}", "<span>".repeat(MAX_DEPTH), "</span>".repeat(MAX_DEPTH));

        let tree = parse_markup(&markup).unwrap();

        assert_eq!(depth(&tree), MAX_DEPTH + 1);
        assert_eq!(tree.to_html(), markup);
    }

    #[test]
    fn flattened_nodes_still_drop_scripts() {
        let markup = format!("{}<script>bad()</script>ok", "<div>".repeat(MAX_DEPTH + 10));

        let tree = parse_markup(&markup).unwrap();

        assert!(!tree.text_content().contains("bad"));
        assert_eq!(tree.text_content(), "ok");
    }

    #[test]
    fn keeps_namespace_prefix_of_foreign_attributes() {
        let tree = parse_markup(r##"<svg><use xlink:href="#a"></use></svg>"##).unwrap();

        let using = &tree.children()[0].children()[0];
        assert_eq!(using.attribute("xlink:href"), Some("#a"));
    }
}
