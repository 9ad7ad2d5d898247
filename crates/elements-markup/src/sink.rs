//! An arena implementation of html5ever's sink trait.
//!
//! The tree builder drives this sink while parsing; once parsing finishes the
//! arena is converted into [`StructuralNode`]s by the parser module.

use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell, RefMut};

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::QualName;

/// Handle of the document node.
pub(crate) const DOCUMENT: usize = 0;

/// Payload of an arena node.
#[derive(Debug)]
pub(crate) enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<(String, String)>,
        /// Content fragment of a `<template>` element
        template_contents: Option<usize>,
    },
    Text(String),
    Comment(String),
}

/// A node in the arena.
#[derive(Debug)]
pub(crate) struct ArenaNode {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

/// The finished arena handed back by [`TreeSink::finish`].
#[derive(Debug)]
pub(crate) struct Arena {
    pub(crate) nodes: Vec<ArenaNode>,
}

impl Arena {
    pub(crate) fn node(&self, id: usize) -> &ArenaNode {
        &self.nodes[id]
    }

    /// Local name of an element node.
    pub(crate) fn local_name(&self, id: usize) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Find the first element with the given local name, depth first.
    pub(crate) fn find_element(&self, from: usize, local: &str) -> Option<usize> {
        if self.local_name(from) == Some(local) {
            return Some(from);
        }
        self.nodes[from]
            .children
            .iter()
            .find_map(|child| self.find_element(*child, local))
    }
}

fn convert_attrs(attrs: Vec<html5ever::Attribute>) -> Vec<(String, String)> {
    attrs
        .into_iter()
        .map(|attr| {
            let name = match &attr.name.prefix {
                Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                None => attr.name.local.to_string(),
            };
            (name, attr.value.to_string())
        })
        .collect()
}

/// Sink collecting the tree builder's output into an arena.
pub(crate) struct ArenaSink {
    nodes: RefCell<Vec<ArenaNode>>,

    /// Number of recoverable errors reported by the tree builder.
    errors: Cell<usize>,
}

impl ArenaSink {
    pub(crate) fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![ArenaNode {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }]),
            errors: Cell::new(0),
        }
    }

    #[track_caller]
    fn nodes_mut(&self) -> RefMut<'_, Vec<ArenaNode>> {
        self.nodes.borrow_mut()
    }

    fn create(&self, data: NodeData) -> usize {
        let mut nodes = self.nodes_mut();
        nodes.push(ArenaNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        nodes.len() - 1
    }

    fn detach(nodes: &mut [ArenaNode], id: usize) {
        if let Some(parent) = nodes[id].parent.take() {
            nodes[parent].children.retain(|child| *child != id);
        }
    }

    fn append_child(&self, parent: usize, child: usize) {
        let mut nodes = self.nodes_mut();
        Self::detach(&mut nodes, child);
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    fn insert_before(&self, sibling: usize, child: usize) {
        let mut nodes = self.nodes_mut();
        let Some(parent) = nodes[sibling].parent else {
            return;
        };
        Self::detach(&mut nodes, child);
        let index = nodes[parent]
            .children
            .iter()
            .position(|id| *id == sibling)
            .unwrap_or(nodes[parent].children.len());
        nodes[child].parent = Some(parent);
        nodes[parent].children.insert(index, child);
    }

    /// Append text to an existing text node. Returns false if `id` is not text.
    fn append_text_to_node(&self, id: usize, text: &str) -> bool {
        match &mut self.nodes_mut()[id].data {
            NodeData::Text(existing) => {
                existing.push_str(text);
                true
            }
            _ => false,
        }
    }
}

impl TreeSink for ArenaSink {
    type Output = Arena;

    type Handle = usize;

    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let errors = self.errors.get();
        if errors > 0 {
            tracing::trace!("Recovered from {} markup errors", errors);
        }
        Arena {
            nodes: self.nodes.into_inner(),
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::trace!("Markup error: {}", msg);
        self.errors.set(self.errors.get() + 1);
    }

    fn get_document(&self) -> Self::Handle {
        DOCUMENT
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.nodes.borrow(), |nodes| match &nodes[*target].data {
            NodeData::Element { name, .. } => name,
            _ => panic!("TreeSink::elem_name called on a node which is not an element!"),
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let template_contents = flags.template.then(|| self.create(NodeData::Document));
        self.create(NodeData::Element {
            name,
            attrs: convert_attrs(attrs),
            template_contents,
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.create(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        self.create(NodeData::Comment(format!("?{target} {data}")))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(id) => self.append_child(*parent, id),
            // Merge into a trailing text node when there is one
            NodeOrText::AppendText(text) => {
                let last = self.nodes.borrow()[*parent].children.last().copied();
                let merged = last.is_some_and(|id| self.append_text_to_node(id, &text));
                if !merged {
                    let id = self.create(NodeData::Text(text.to_string()));
                    self.append_child(*parent, id);
                }
            }
        }
    }

    // The tree builder promises there is no text node after the insertion point.
    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(id) => self.insert_before(*sibling, id),
            NodeOrText::AppendText(text) => {
                let previous = {
                    let nodes = self.nodes.borrow();
                    nodes[*sibling].parent.and_then(|parent| {
                        let siblings = &nodes[parent].children;
                        let index = siblings.iter().position(|id| id == sibling)?;
                        index.checked_sub(1).map(|prev| siblings[prev])
                    })
                };
                let merged = previous.is_some_and(|id| self.append_text_to_node(id, &text));
                if !merged {
                    let id = self.create(NodeData::Text(text.to_string()));
                    self.insert_before(*sibling, id);
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.nodes.borrow()[*element].parent.is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        match &self.nodes.borrow()[*target].data {
            NodeData::Element {
                template_contents: Some(contents),
                ..
            } => *contents,
            _ => *target,
        }
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    // Markup is always wrapped in a document with a doctype, so quirks never apply.
    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        if let NodeData::Element { attrs: existing, .. } = &mut self.nodes_mut()[*target].data {
            for (name, value) in convert_attrs(attrs) {
                if !existing.iter().any(|(present, _)| *present == name) {
                    existing.push((name, value));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        Self::detach(&mut self.nodes_mut(), *target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut nodes = self.nodes_mut();
        let children = std::mem::take(&mut nodes[*node].children);
        for child in &children {
            nodes[*child].parent = Some(*new_parent);
        }
        nodes[*new_parent].children.extend(children);
    }
}
