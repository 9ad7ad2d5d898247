//! Vue adapter.
//!
//! Mirrors Vue's `h()`: a lone text child is stored as text children rather
//! than a child array, and empty text children are dropped.

use elements_markup::node::write_open_tag;
use elements_markup::{is_void_element, Attributes};

use crate::traits::{FrameworkAdapter, NodeBuilder};

/// Kind of a Vue virtual node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VueNodeType {
    Element(String),
    Fragment,
    Text,
}

/// Normalized children of a Vue virtual node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VueChildren {
    #[default]
    None,
    Text(String),
    Nodes(Vec<VueNode>),
}

/// A Vue virtual node.
#[derive(Debug, Clone, PartialEq)]
pub struct VueNode {
    pub node_type: VueNodeType,
    pub props: Attributes,
    pub children: VueChildren,
}

impl VueNode {
    fn text(value: &str) -> Self {
        Self {
            node_type: VueNodeType::Text,
            props: Attributes::new(),
            children: VueChildren::Text(value.to_string()),
        }
    }

    fn text_value(&self) -> Option<&str> {
        match (&self.node_type, &self.children) {
            (VueNodeType::Text, VueChildren::Text(value)) => Some(value),
            _ => None,
        }
    }
}

/// Vue adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct VueAdapter;

impl VueAdapter {
    /// Create a new Vue adapter.
    pub fn new() -> Self {
        Self
    }
}

fn normalize_children(children: Vec<VueNode>) -> VueChildren {
    let mut children: Vec<VueNode> = children
        .into_iter()
        .filter(|child| child.text_value() != Some(""))
        .collect();

    match children.len() {
        0 => VueChildren::None,
        1 if children[0].node_type == VueNodeType::Text => match children.remove(0).children {
            VueChildren::Text(value) => VueChildren::Text(value),
            _ => VueChildren::None,
        },
        _ => VueChildren::Nodes(children),
    }
}

impl NodeBuilder for VueAdapter {
    type Node = VueNode;

    fn element(&self, tag: &str, attributes: &Attributes, children: Vec<VueNode>) -> VueNode {
        let children = if is_void_element(tag) {
            VueChildren::None
        } else {
            normalize_children(children)
        };

        VueNode {
            node_type: VueNodeType::Element(tag.to_string()),
            props: attributes.clone(),
            children,
        }
    }

    fn fragment(&self, children: Vec<VueNode>) -> VueNode {
        let children = match normalize_children(children) {
            // Fragments always hold an array of children
            VueChildren::Text(value) => VueChildren::Nodes(vec![VueNode::text(&value)]),
            other => other,
        };

        VueNode {
            node_type: VueNodeType::Fragment,
            props: Attributes::new(),
            children,
        }
    }

    fn text(&self, value: &str) -> VueNode {
        VueNode::text(value)
    }
}

impl FrameworkAdapter for VueAdapter {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn to_html(&self, node: &VueNode) -> String {
        let mut out = String::new();
        write_node(node, &mut out);
        out
    }
}

fn write_children(children: &VueChildren, out: &mut String) {
    match children {
        VueChildren::None => {}
        VueChildren::Text(value) => {
            html_escape::encode_text_to_string(value, out);
        }
        VueChildren::Nodes(nodes) => {
            for node in nodes {
                write_node(node, out);
            }
        }
    }
}

fn write_node(node: &VueNode, out: &mut String) {
    match &node.node_type {
        VueNodeType::Text | VueNodeType::Fragment => write_children(&node.children, out),
        VueNodeType::Element(tag) => {
            write_open_tag(out, tag, &node.props);
            if is_void_element(tag) {
                return;
            }
            write_children(&node.children, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
