//! Parse command: show how markup is parsed and distributed into slots.

use std::path::PathBuf;

use anyhow::{Context, Result};
use elements_markup::{convert, parse_markup};

/// Output format of the parse command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFormat {
    /// Distributed tree as HTML followed by one line per slot
    Html,
    /// Distributed tree and slot map as JSON
    Json,
    /// Undistributed tree as JSON
    Raw,
}

/// Run the parse command.
pub async fn run(input: Option<PathBuf>, format: ParseFormat) -> Result<()> {
    let markup = super::read_input(input.as_deref())?;

    println!("{}", format_markup(&markup, format)?);

    Ok(())
}

/// Parse `markup` and format the result.
pub fn format_markup(markup: &str, format: ParseFormat) -> Result<String> {
    match format {
        ParseFormat::Raw => {
            serde_json::to_string_pretty(&parse_markup(markup)).context("Failed to serialize tree")
        }
        ParseFormat::Json => serde_json::to_string_pretty(&convert(markup))
            .context("Failed to serialize distribution"),
        ParseFormat::Html => {
            let Some(distribution) = convert(markup) else {
                tracing::info!("Markup is empty");
                return Ok(String::new());
            };

            let mut lines = vec![distribution.tree.to_html()];
            lines.extend(
                distribution
                    .slots
                    .iter()
                    .map(|(name, content)| format!("slot {name}: {}", content.to_html())),
            );

            Ok(lines.join("\n"))
        }
    }
}
