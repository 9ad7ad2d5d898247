//! Render command: mount a component inside a custom element and print the
//! resulting view.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use elements_adapters::{
    component_name, element_tag, ComponentExport, CustomElement, ElementOptions, FrameworkAdapter,
    HostElement, PreactAdapter, PropValue, Props, ReactAdapter, RenderTarget, VueAdapter,
};
use serde::Serialize;
use serde_json::Value;

use crate::config::{AdapterKind, Config};

/// Options of the render command.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Tag name of the host element
    pub tag: String,

    /// Adapter overriding the configured one
    pub adapter: Option<AdapterKind>,

    /// Attributes given as `name=value`
    pub attributes: Vec<String>,

    /// JSON payload passed through the `props` attribute
    pub props: Option<String>,

    /// Mark the host as server rendered
    pub server: bool,
}

/// What a component was mounted with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountedView {
    pub tag: String,
    pub adapter: &'static str,
    pub component: String,
    pub props: BTreeMap<String, Value>,
    pub children: Option<String>,
}

/// Render target recording the latest render as a [`MountedView`].
struct ViewTarget<A> {
    adapter: A,
    view: Option<MountedView>,
}

impl<A: FrameworkAdapter> RenderTarget<String, A::Node> for ViewTarget<A> {
    fn render(&mut self, component: &String, props: &Props<A::Node>, children: Option<&A::Node>) {
        let props = props
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    PropValue::Value(value) => value.clone(),
                    PropValue::Node(node) => Value::String(self.adapter.to_html(node)),
                };
                (key.clone(), value)
            })
            .collect();

        self.view = Some(MountedView {
            tag: String::new(),
            adapter: self.adapter.name(),
            component: component.clone(),
            props,
            children: children.map(|node| self.adapter.to_html(node)),
        });
    }

    fn clear(&mut self) {
        self.view = None;
    }
}

/// Run the render command.
pub async fn run(input: Option<PathBuf>, options: RenderOptions, config: &Config) -> Result<()> {
    let markup = super::read_input(input.as_deref())?;

    let view = render(&markup, &options, config).await?;

    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}

/// Mount the configured component for `options.tag` around `markup`.
pub async fn render(markup: &str, options: &RenderOptions, config: &Config) -> Result<MountedView> {
    if options.tag.trim().is_empty() {
        bail!("A tag name is required");
    }

    let tag = element_tag(options.tag.trim());
    let settings = config.element(&tag);

    let mut host = HostElement::new(&tag).with_inner_html(markup);
    let mut observed = settings.attributes.clone();
    for attribute in &options.attributes {
        let (name, value) = attribute.split_once('=').unwrap_or((attribute.as_str(), ""));
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            bail!("Invalid attribute: '{}'", attribute);
        }
        if !observed.contains(&name) {
            observed.push(name.clone());
        }
        host = host.with_attribute(name, value);
    }
    if let Some(props) = &options.props {
        host = host.with_attribute("props", props.as_str());
    }
    if options.server {
        host = host.with_attribute("server", "");
    }

    let component = settings
        .component
        .clone()
        .unwrap_or_else(|| component_name(&tag));
    let element_options = ElementOptions::with_attributes(observed);

    let adapter = options.adapter.or(settings.adapter).unwrap_or_default();
    tracing::debug!("Rendering <{}> as {} with {:?}", tag, component, adapter);

    let mut view = match adapter {
        AdapterKind::Preact => mount(PreactAdapter::new(), &host, element_options, component).await?,
        AdapterKind::React => mount(ReactAdapter::new(), &host, element_options, component).await?,
        AdapterKind::Vue => mount(VueAdapter::new(), &host, element_options, component).await?,
    };
    view.tag = tag;

    Ok(view)
}

async fn mount<A>(
    adapter: A,
    host: &HostElement,
    options: ElementOptions<String>,
    component: String,
) -> Result<MountedView>
where
    A: FrameworkAdapter + Clone,
{
    let mut element = CustomElement::new(adapter.clone(), options);
    let mut target = ViewTarget { adapter, view: None };

    element.connect(host)?;
    element
        .mount_async(async { ComponentExport::Component(component) }, &mut target)
        .await?;

    match target.view {
        Some(view) => Ok(view),
        None => bail!("Nothing was rendered for <{}>", element.tag_name()),
    }
}
