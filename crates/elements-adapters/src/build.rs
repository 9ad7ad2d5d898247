//! Conversion of distributed markup into framework renderables.

use std::collections::BTreeMap;

use elements_markup::{convert, SlotContent, StructuralNode};

use crate::traits::NodeBuilder;

/// Renderable value of a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue<N> {
    /// Plain text, passed to components as a string prop
    Text(String),

    /// Structured content built by the adapter
    Node(N),
}

/// Children and slots of a host element, built by one adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<N> {
    /// The element's children with slotted content removed
    pub children: N,

    /// Slot content keyed by normalized slot name
    pub slots: BTreeMap<String, SlotValue<N>>,
}

/// Build a renderable from a structural tree.
///
/// Fragments are built with [`NodeBuilder::fragment`]; comments produce nothing.
pub fn build_tree<B: NodeBuilder + ?Sized>(builder: &B, node: &StructuralNode) -> Option<B::Node> {
    match node {
        StructuralNode::Text(value) => Some(builder.text(value)),
        StructuralNode::Comment(_) => None,
        StructuralNode::Fragment { children } => {
            Some(builder.fragment(build_children(builder, children)))
        }
        StructuralNode::Element {
            tag,
            attributes,
            children,
        } => Some(builder.element(tag, attributes, build_children(builder, children))),
    }
}

fn build_children<B: NodeBuilder + ?Sized>(
    builder: &B,
    children: &[StructuralNode],
) -> Vec<B::Node> {
    children
        .iter()
        .filter_map(|child| build_tree(builder, child))
        .collect()
}

/// Build the renderable value of a slot.
pub fn build_slot<B: NodeBuilder + ?Sized>(builder: &B, content: &SlotContent) -> SlotValue<B::Node> {
    match content {
        SlotContent::Text(value) => SlotValue::Text(value.clone()),
        SlotContent::Fragment(children) => {
            SlotValue::Node(builder.fragment(build_children(builder, children)))
        }
    }
}

/// Parse markup, distribute its slots and build everything with `builder`.
///
/// Returns `None` when the markup produced no tree.
pub fn render_markup<B: NodeBuilder + ?Sized>(builder: &B, markup: &str) -> Option<Rendered<B::Node>> {
    let distribution = convert(markup)?;

    let children = build_tree(builder, &distribution.tree)?;
    let slots = distribution
        .slots
        .iter()
        .map(|(name, content)| (name.clone(), build_slot(builder, content)))
        .collect();

    Some(Rendered { children, slots })
}
