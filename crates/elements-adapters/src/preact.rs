//! Preact adapter.
//!
//! Builds `h(tag, props, children)` style virtual nodes. Fragments are
//! transparent when mounted.

use elements_markup::node::write_open_tag;
use elements_markup::{is_void_element, Attributes};

use crate::traits::{FrameworkAdapter, NodeBuilder};

/// A Preact virtual node.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    /// `h(tag, props, children)`
    Element {
        tag: String,
        props: Attributes,
        children: Vec<VNode>,
    },

    /// `h(Fragment, {}, children)`
    Fragment(Vec<VNode>),

    /// A string child
    Text(String),
}

/// Preact adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreactAdapter;

impl PreactAdapter {
    /// Create a new Preact adapter.
    pub fn new() -> Self {
        Self
    }
}

impl NodeBuilder for PreactAdapter {
    type Node = VNode;

    fn element(&self, tag: &str, attributes: &Attributes, children: Vec<VNode>) -> VNode {
        // Void elements are created without a children argument
        let children = if is_void_element(tag) {
            Vec::new()
        } else {
            children
        };

        VNode::Element {
            tag: tag.to_string(),
            props: attributes.clone(),
            children,
        }
    }

    fn fragment(&self, children: Vec<VNode>) -> VNode {
        VNode::Fragment(children)
    }

    fn text(&self, value: &str) -> VNode {
        VNode::Text(value.to_string())
    }
}

impl FrameworkAdapter for PreactAdapter {
    fn name(&self) -> &'static str {
        "preact"
    }

    fn to_html(&self, node: &VNode) -> String {
        let mut out = String::new();
        render_to_string(node, &mut out);
        out
    }
}

fn render_to_string(node: &VNode, out: &mut String) {
    match node {
        VNode::Text(value) => {
            html_escape::encode_text_to_string(value, out);
        }
        VNode::Fragment(children) => {
            for child in children {
                render_to_string(child, out);
            }
        }
        VNode::Element {
            tag,
            props,
            children,
        } => {
            write_open_tag(out, tag, props);
            if is_void_element(tag) {
                return;
            }
            for child in children {
                render_to_string(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
