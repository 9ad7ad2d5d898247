//! Structural node tree produced by the markup parser.

use std::collections::BTreeMap;

use serde::Serialize;

/// Attribute map of an element. Ordered so that equality does not depend on
/// the order attributes appeared in the source.
pub type Attributes = BTreeMap<String, String>;

/// Element names that never have children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check whether a tag name is a void element (case-insensitive).
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// A node of the parsed markup tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralNode {
    /// Transparent wrapper around a list of nodes. The parser's root is always a fragment.
    Fragment { children: Vec<StructuralNode> },

    /// A concrete element.
    Element {
        /// Lower-case tag name
        tag: String,
        /// Attribute names as reported by the tokenizer
        attributes: Attributes,
        /// Child nodes (always empty for void elements)
        children: Vec<StructuralNode>,
    },

    /// Raw text content.
    Text(String),

    /// Comment or processing instruction. Never rendered.
    Comment(String),
}

impl StructuralNode {
    /// Create a fragment node.
    pub fn fragment(children: Vec<StructuralNode>) -> Self {
        Self::Fragment { children }
    }

    /// Create an element node.
    pub fn element(
        tag: impl Into<String>,
        attributes: Attributes,
        children: Vec<StructuralNode>,
    ) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes,
            children,
        }
    }

    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Tag name, or `None` for text, comments and fragments.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Attributes of an element node.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Look up a single attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()?.get(name).map(String::as_str)
    }

    /// Child nodes. Empty for text and comments.
    pub fn children(&self) -> &[StructuralNode] {
        match self {
            Self::Fragment { children } | Self::Element { children, .. } => children,
            Self::Text(_) | Self::Comment(_) => &[],
        }
    }

    /// Text payload of a text node.
    pub fn text_value(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(value) => out.push_str(value),
            Self::Comment(_) => {}
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Serialize the tree back to markup.
    ///
    /// Fragments and comments produce no markup of their own; void elements are
    /// written without a closing tag.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Element {
                tag,
                attributes,
                children,
            } => {
                write_open_tag(out, tag, attributes.iter());
                if is_void_element(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Self::Text(value) => {
                html_escape::encode_text_to_string(value, out);
            }
            Self::Comment(_) => {}
        }
    }
}

/// Write `<tag name="value" ...>` with escaped attribute values.
pub fn write_open_tag<'a>(
    out: &mut String,
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a String, &'a String)>,
) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        html_escape::encode_double_quoted_attribute_to_string(value, out);
        out.push('"');
    }
    out.push('>');
}
