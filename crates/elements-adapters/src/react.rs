//! React adapter.
//!
//! Mirrors `createElement(type, props, ...children)`. Element children get a
//! positional `key` so that sibling lists reconcile without warnings.

use elements_markup::node::write_open_tag;
use elements_markup::{is_void_element, Attributes};

use crate::traits::{FrameworkAdapter, NodeBuilder};

/// The `type` argument of `createElement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// A host (DOM) element such as `"div"`
    Host(String),
    /// `React.Fragment`
    Fragment,
}

/// A React element.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactElement {
    pub element_type: ElementType,
    pub key: Option<String>,
    pub props: Attributes,
    pub children: Vec<ReactNode>,
}

/// Anything React can render as a child.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactNode {
    Element(ReactElement),
    Text(String),
}

impl ReactNode {
    /// The element's key, if this node is a keyed element.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Element(element) => element.key.as_deref(),
            Self::Text(_) => None,
        }
    }
}

/// React adapter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReactAdapter;

impl ReactAdapter {
    /// Create a new React adapter.
    pub fn new() -> Self {
        Self
    }

    fn create_element(
        &self,
        element_type: ElementType,
        props: Attributes,
        mut children: Vec<ReactNode>,
    ) -> ReactNode {
        for (index, child) in children.iter_mut().enumerate() {
            if let ReactNode::Element(element) = child {
                element.key.get_or_insert_with(|| index.to_string());
            }
        }

        ReactNode::Element(ReactElement {
            element_type,
            key: None,
            props,
            children,
        })
    }
}

impl NodeBuilder for ReactAdapter {
    type Node = ReactNode;

    fn element(&self, tag: &str, attributes: &Attributes, children: Vec<ReactNode>) -> ReactNode {
        let children = if is_void_element(tag) {
            Vec::new()
        } else {
            children
        };

        self.create_element(ElementType::Host(tag.to_string()), attributes.clone(), children)
    }

    fn fragment(&self, children: Vec<ReactNode>) -> ReactNode {
        self.create_element(ElementType::Fragment, Attributes::new(), children)
    }

    fn text(&self, value: &str) -> ReactNode {
        ReactNode::Text(value.to_string())
    }
}

impl FrameworkAdapter for ReactAdapter {
    fn name(&self) -> &'static str {
        "react"
    }

    fn to_html(&self, node: &ReactNode) -> String {
        let mut out = String::new();
        write_node(node, &mut out);
        out
    }
}

fn write_node(node: &ReactNode, out: &mut String) {
    let element = match node {
        ReactNode::Text(value) => {
            html_escape::encode_text_to_string(value, out);
            return;
        }
        ReactNode::Element(element) => element,
    };

    let tag = match &element.element_type {
        ElementType::Fragment => {
            for child in &element.children {
                write_node(child, out);
            }
            return;
        }
        ElementType::Host(tag) => tag,
    };

    write_open_tag(out, tag, &element.props);
    if is_void_element(tag) {
        return;
    }
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
