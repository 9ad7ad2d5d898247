//! Host element lifecycle.
//!
//! [`CustomElement`] models the custom element callbacks of the host runtime
//! as an explicit state machine:
//!
//! ```text
//! Unattached -> Connected -> Mounted -> (attribute updates) -> Disconnected
//!                   ^                                               |
//!                   +----------------- reconnect -------------------+
//! ```
//!
//! The host runtime supplies a [`HostElement`] snapshot on connection and
//! forwards attribute changes; rendering goes through a [`RenderTarget`].

use std::fmt;
use std::future::Future;

use elements_markup::prop_key;
use serde_json::Value;

use crate::build::{render_markup, SlotValue};
use crate::element::{resolve_component, ComponentExport};
use crate::props::{attribute_props, parse_props, PropValue, Props, PropsFormatter};
use crate::traits::{ElementError, FrameworkAdapter};

/// Attribute carrying a JSON props payload.
pub const PROPS_ATTRIBUTE: &str = "props";

/// Attribute marking content that was already rendered on the server.
pub const SERVER_ATTRIBUTE: &str = "server";

/// Snapshot of a host element at connection time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostElement {
    /// Tag name as reported by the host
    pub tag_name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Serialized light DOM children
    pub inner_html: String,

    /// Body of a `<script type="application/json">` child, if any
    pub json_script: Option<String>,
}

impl HostElement {
    /// Create a snapshot of an element with no attributes or children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the inner markup.
    pub fn with_inner_html(mut self, markup: impl Into<String>) -> Self {
        self.inner_html = markup.into();
        self
    }

    /// Set the JSON script payload.
    pub fn with_json_script(mut self, json: impl Into<String>) -> Self {
        self.json_script = Some(json.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Options for a custom element definition.
pub struct ElementOptions<C> {
    /// Attributes mapped to props and observed for changes
    pub attributes: Vec<String>,

    /// Applied to JSON props after decoding
    pub format_props: Option<PropsFormatter>,

    /// Applied to the component before it is mounted
    pub wrap_component: Option<Box<dyn Fn(C) -> C + Send + Sync>>,
}

impl<C> Default for ElementOptions<C> {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            format_props: None,
            wrap_component: None,
        }
    }
}

impl<C> fmt::Debug for ElementOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementOptions")
            .field("attributes", &self.attributes)
            .field("format_props", &self.format_props.is_some())
            .field("wrap_component", &self.wrap_component.is_some())
            .finish()
    }
}

impl<C> ElementOptions<C> {
    /// Options observing the given attributes.
    pub fn with_attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Lifecycle state of a [`CustomElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// Created but never connected
    Unattached,
    /// Connected; props and children are prepared but nothing is rendered
    Connected,
    /// A component is rendered into the host
    Mounted,
    /// Removed from the document
    Disconnected,
}

/// Where a mounted component is rendered. Implemented by the host runtime.
pub trait RenderTarget<C, N> {
    /// Render `component` with `props` and `children` into the host element.
    fn render(&mut self, component: &C, props: &Props<N>, children: Option<&N>);

    /// Remove whatever was rendered.
    fn clear(&mut self);
}

/// A framework component mounted inside a custom element.
#[derive(Debug)]
pub struct CustomElement<A: FrameworkAdapter, C> {
    adapter: A,
    options: ElementOptions<C>,
    tag_name: String,
    state: ElementState,
    properties: Props<A::Node>,
    children: Option<A::Node>,
    instance: Option<C>,
}

impl<A: FrameworkAdapter, C> CustomElement<A, C> {
    /// Create an unattached element.
    pub fn new(adapter: A, options: ElementOptions<C>) -> Self {
        Self {
            adapter,
            options,
            tag_name: String::new(),
            state: ElementState::Unattached,
            properties: Props::new(),
            children: None,
            instance: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ElementState {
        self.state
    }

    /// The adapter building this element's renderables.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Lower-case tag name of the connected host.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Attributes the host runtime must report changes for.
    pub fn observed_attributes(&self) -> Vec<String> {
        std::iter::once(PROPS_ATTRIBUTE.to_string())
            .chain(self.options.attributes.iter().cloned())
            .collect()
    }

    /// Props passed to the component.
    pub fn properties(&self) -> &Props<A::Node> {
        &self.properties
    }

    /// Children parsed from the host's light DOM.
    pub fn children(&self) -> Option<&A::Node> {
        self.children.as_ref()
    }

    /// The mounted component.
    pub fn instance(&self) -> Option<&C> {
        self.instance.as_ref()
    }

    /// Handle the host's connection.
    ///
    /// Collects props from slots, the JSON payload and observed attributes (in
    /// increasing precedence) and converts the light DOM into children, unless
    /// the host was rendered on the server.
    pub fn connect(&mut self, host: &HostElement) -> Result<(), ElementError> {
        let tag_name = host.tag_name.to_lowercase();

        if matches!(self.state, ElementState::Connected | ElementState::Mounted) {
            return Err(ElementError::AlreadyConnected(tag_name));
        }

        let attributes = attribute_props(
            host.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str())),
            Some(self.options.attributes.as_slice()),
        );
        let payload = host
            .attribute(PROPS_ATTRIBUTE)
            .filter(|value| !value.is_empty())
            .or(host.json_script.as_deref())
            .unwrap_or("{}");
        let data = parse_props(payload, &tag_name, self.options.format_props.as_ref());

        let mut properties = Props::new();
        let mut children = None;

        if !host.has_attribute(SERVER_ATTRIBUTE) {
            if let Some(rendered) = render_markup(&self.adapter, &host.inner_html) {
                for (name, slot) in rendered.slots {
                    let value = match slot {
                        SlotValue::Text(text) => PropValue::Value(Value::String(text)),
                        SlotValue::Node(node) => PropValue::Node(node),
                    };
                    properties.insert(name, value);
                }
                children = Some(rendered.children);
            }
        }

        for (key, value) in data {
            properties.insert(key, PropValue::Value(value));
        }
        for (key, value) in attributes {
            properties.insert(key, PropValue::Value(Value::String(value)));
        }

        tracing::debug!(
            "Connected <{}> with {} props using {}",
            tag_name,
            properties.len(),
            self.adapter.name()
        );

        self.tag_name = tag_name;
        self.properties = properties;
        self.children = children;
        self.instance = None;
        self.state = ElementState::Connected;

        Ok(())
    }

    /// Resolve the component and render it into `target`.
    pub fn mount<T>(&mut self, export: ComponentExport<C>, target: &mut T) -> Result<(), ElementError>
    where
        T: RenderTarget<C, A::Node>,
    {
        let component = export.resolve(&self.tag_name);
        self.finalise(component, target)
    }

    /// Await an asynchronously loaded component and render it into `target`.
    pub async fn mount_async<F, T>(&mut self, export: F, target: &mut T) -> Result<(), ElementError>
    where
        F: Future<Output = ComponentExport<C>>,
        T: RenderTarget<C, A::Node>,
    {
        let tag_name = self.tag_name.clone();
        let component = resolve_component(export, &tag_name).await;
        self.finalise(component, target)
    }

    fn finalise<T>(&mut self, component: Option<C>, target: &mut T) -> Result<(), ElementError>
    where
        T: RenderTarget<C, A::Node>,
    {
        if self.state != ElementState::Connected {
            return Err(ElementError::NotConnected(self.tag_name.clone()));
        }

        let Some(component) = component else {
            let err = ElementError::MissingComponent(self.tag_name.clone());
            tracing::error!("{}", err);
            return Err(err);
        };

        let component = match &self.options.wrap_component {
            Some(wrap) => wrap(component),
            None => component,
        };

        target.render(&component, &self.properties, self.children.as_ref());

        tracing::debug!("Mounted <{}>", self.tag_name);
        self.instance = Some(component);
        self.state = ElementState::Mounted;

        Ok(())
    }

    /// Handle an attribute change reported by the host.
    ///
    /// Ignored unless mounted. `value` is `None` when the attribute was removed.
    pub fn attribute_changed<T>(&mut self, name: &str, value: Option<&str>, target: &mut T)
    where
        T: RenderTarget<C, A::Node>,
    {
        if self.state != ElementState::Mounted {
            tracing::trace!("Ignoring '{}' change on <{}> before mount", name, self.tag_name);
            return;
        }

        if name == PROPS_ATTRIBUTE {
            if let Some(json) = value {
                let data = parse_props(json, &self.tag_name, self.options.format_props.as_ref());
                for (key, value) in data {
                    self.properties.insert(key, PropValue::Value(value));
                }
            }
        } else if self.options.attributes.iter().any(|a| a == name) {
            let key = prop_key(name);
            match value {
                Some(value) => {
                    self.properties
                        .insert(key, PropValue::Value(Value::String(value.to_string())));
                }
                None => {
                    self.properties.remove(&key);
                }
            }
        } else {
            tracing::trace!("Ignoring unobserved attribute '{}' on <{}>", name, self.tag_name);
            return;
        }

        if let Some(component) = &self.instance {
            target.render(component, &self.properties, self.children.as_ref());
        }
    }

    /// Handle the host's disconnection.
    pub fn disconnect<T>(&mut self, target: &mut T)
    where
        T: RenderTarget<C, A::Node>,
    {
        if self.state == ElementState::Mounted {
            target.clear();
        }

        tracing::debug!("Disconnected <{}>", self.tag_name);
        self.instance = None;
        self.state = ElementState::Disconnected;
    }
}
