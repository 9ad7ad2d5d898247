//! Markup parsing and slot distribution for custom element adapters.
//!
//! This crate turns the inner markup of a custom element into a structural
//! tree, strips unsafe content, and lifts `slot="..."` content into a side
//! table keyed by normalized prop name. Framework adapters build their own
//! renderables from the result.

pub mod keys;
pub mod node;
pub mod parser;
mod sink;
pub mod slots;

pub use keys::prop_key;
pub use node::{is_void_element, Attributes, StructuralNode, VOID_ELEMENTS};
pub use parser::{parse_markup, MAX_DEPTH};
pub use slots::{convert, distribute_slots, Distribution, SlotContent, SlotMap, SLOT_ATTRIBUTE};
