//! Component props from JSON payloads and element attributes.

use std::collections::BTreeMap;
use std::fmt;

use elements_markup::prop_key;
use serde_json::{Map, Value};

use crate::traits::ElementError;

/// Props decoded from a JSON payload.
pub type JsonProps = Map<String, Value>;

/// Hook applied to decoded JSON props before they reach the component.
pub type PropsFormatter = Box<dyn Fn(JsonProps) -> JsonProps + Send + Sync>;

/// A single prop passed to a mounted component.
#[derive(Clone, PartialEq)]
pub enum PropValue<N> {
    /// A JSON value (attribute strings and text slots are JSON strings)
    Value(Value),

    /// Renderable slot content
    Node(N),
}

impl<N> PropValue<N> {
    /// String value of a string prop.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.as_str(),
            Self::Node(_) => None,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for PropValue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Node(node) => node.fmt(f),
        }
    }
}

/// Props of a mounted component, keyed by prop name.
pub type Props<N> = BTreeMap<String, PropValue<N>>;

/// Decode a JSON props payload.
///
/// The payload must be a JSON object.
pub fn try_parse_props(value: &str, tag_name: &str) -> Result<JsonProps, ElementError> {
    let invalid = |message: String| ElementError::InvalidJson {
        tag: tag_name.to_lowercase(),
        message,
    };

    match serde_json::from_str::<Value>(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(invalid(format!("expected an object, found {other}"))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Decode a JSON props payload, falling back to empty props.
///
/// Invalid payloads are logged and treated as `{}`. The formatter, when given,
/// runs on the decoded props either way.
pub fn parse_props(value: &str, tag_name: &str, formatter: Option<&PropsFormatter>) -> JsonProps {
    let props = try_parse_props(value, tag_name).unwrap_or_else(|e| {
        tracing::error!("{}", e);
        JsonProps::new()
    });

    match formatter {
        Some(format) => format(props),
        None => props,
    }
}

/// Map element attributes to props.
///
/// Only attributes named in `allowed` are kept (all of them when `allowed` is
/// `None`). Names are normalized with [`prop_key`]; when two attributes map to
/// the same key, the first one wins.
pub fn attribute_props<'a, I>(attributes: I, allowed: Option<&[String]>) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut props = BTreeMap::new();

    for (name, value) in attributes {
        if let Some(allowed) = allowed {
            if !allowed.iter().any(|a| a == name) {
                continue;
            }
        }

        props
            .entry(prop_key(name))
            .or_insert_with(|| value.to_string());
    }

    props
}
