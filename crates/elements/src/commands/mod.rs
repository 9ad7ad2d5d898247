//! CLI subcommands.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

pub mod parse;
pub mod render;

/// Read markup from `input`, or from stdin when no path (or `-`) is given.
pub fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut markup = String::new();
            io::stdin()
                .read_to_string(&mut markup)
                .context("Failed to read markup from stdin")?;
            Ok(markup)
        }
    }
}
