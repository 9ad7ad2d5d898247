//! Framework adapters for mounting components inside custom elements.
//!
//! Each adapter turns the distributed markup of a host element into the
//! renderables of one framework (Preact, React or Vue). [`CustomElement`]
//! drives the host lifecycle: it collects props from attributes, JSON payloads
//! and slots, resolves the component and re-renders on attribute changes.

pub mod build;
pub mod element;
pub mod host;
pub mod preact;
pub mod props;
pub mod react;
pub mod traits;
pub mod vue;

pub use build::{build_slot, build_tree, render_markup, Rendered, SlotValue};
pub use element::{component_name, element_tag, resolve_component, ComponentExport, TAG_PREFIX};
pub use host::{CustomElement, ElementOptions, ElementState, HostElement, RenderTarget};
pub use preact::{PreactAdapter, VNode};
pub use props::{attribute_props, parse_props, try_parse_props, JsonProps, PropValue, Props, PropsFormatter};
pub use react::{ReactAdapter, ReactElement, ReactNode};
pub use traits::{ElementError, FrameworkAdapter, NodeBuilder};
pub use vue::{VueAdapter, VueChildren, VueNode};
