//! Custom element naming and component resolution.

use std::collections::HashMap;
use std::future::Future;

/// Prefix added to tag names that are not valid custom element names.
pub const TAG_PREFIX: &str = "component-";

/// Turn a component tag into a valid custom element name.
///
/// Custom element names must contain a hyphen, so names without one are
/// prefixed with [`TAG_PREFIX`].
pub fn element_tag(name: &str) -> String {
    let tag = name.to_lowercase();

    if tag.contains('-') {
        tag
    } else {
        format!("{TAG_PREFIX}{tag}")
    }
}

/// Derive the export name of a component from its tag: `tag-name` → `TagName`.
pub fn component_name(tag: &str) -> String {
    let lower = tag.to_lowercase();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut name = String::with_capacity(lower.len());
    let mut chars = lower.chars().peekable();
    let mut at_start = true;

    while let Some(c) = chars.next() {
        if at_start && is_word(c) {
            name.extend(c.to_uppercase());
        } else if c == '-' && chars.peek().is_some_and(|next| is_word(*next)) {
            if let Some(next) = chars.next() {
                name.extend(next.to_uppercase());
            }
        } else {
            name.push(c);
        }
        at_start = false;
    }

    name
}

/// What a component loader hands back: the component itself, or a module of
/// named exports to pick it from.
#[derive(Debug, Clone)]
pub enum ComponentExport<C> {
    Component(C),
    Module(HashMap<String, C>),
}

impl<C> ComponentExport<C> {
    /// Pick the component for `tag_name`.
    ///
    /// Modules are searched for the export named after the tag (see
    /// [`component_name`]).
    pub fn resolve(self, tag_name: &str) -> Option<C> {
        match self {
            Self::Component(component) => Some(component),
            Self::Module(mut exports) => exports.remove(&component_name(tag_name)),
        }
    }
}

/// Await an asynchronously loaded component and resolve it for `tag_name`.
pub async fn resolve_component<C, F>(export: F, tag_name: &str) -> Option<C>
where
    F: Future<Output = ComponentExport<C>>,
{
    export.await.resolve(tag_name)
}
