//! Trait definitions for framework adapters.

use std::fmt;

use elements_markup::Attributes;

/// Builds a framework's renderables from parsed markup.
///
/// Every adapter shares the same parser and slot distribution; the only thing
/// that differs between frameworks is how the three kinds of node are built.
pub trait NodeBuilder {
    /// The framework's renderable type.
    type Node: Clone + fmt::Debug;

    /// Build a concrete element, e.g. `h(tag, props, children)`.
    fn element(&self, tag: &str, attributes: &Attributes, children: Vec<Self::Node>)
        -> Self::Node;

    /// Build a fragment grouping `children` without a wrapper element.
    fn fragment(&self, children: Vec<Self::Node>) -> Self::Node;

    /// Build a text node.
    fn text(&self, value: &str) -> Self::Node;
}

/// Trait for framework-specific adapters.
pub trait FrameworkAdapter: NodeBuilder + Send + Sync {
    /// Framework identifier (e.g., "preact", "react")
    fn name(&self) -> &'static str;

    /// Serialize a renderable the way the framework would mount it into the DOM.
    fn to_html(&self, node: &Self::Node) -> String;
}

/// Errors that can occur while driving a custom element.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("Invalid JSON string passed to component: <{tag}>: {message}")]
    InvalidJson { tag: String, message: String },

    #[error("Cannot find component in provided function: <{0}>")]
    MissingComponent(String),

    #[error("Element is already connected: <{0}>")]
    AlreadyConnected(String),

    #[error("Element is not connected: <{0}>")]
    NotConnected(String),
}
