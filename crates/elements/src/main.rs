//! component-elements CLI - parse markup and mount framework components inside
//! custom elements.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::parse::ParseFormat;
use commands::render::RenderOptions;
use config::AdapterKind;

#[derive(Parser)]
#[command(name = "component-elements")]
#[command(about = "Mount Preact, React and Vue components inside custom elements")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to elements.toml config file
    #[arg(short, long, default_value = "elements.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse markup and show the distributed tree and slots
    Parse {
        /// Markup file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Print the tree and slot map as JSON
        #[arg(long)]
        json: bool,

        /// Print the parsed tree before slot distribution, as JSON
        #[arg(long, conflicts_with = "json")]
        raw: bool,
    },

    /// Mount a component around markup and print what it receives
    Render {
        /// Markup file with the element's children (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Tag name of the custom element
        #[arg(short, long)]
        tag: String,

        /// Adapter to mount with (overrides the config)
        #[arg(short, long, value_enum)]
        adapter: Option<AdapterKind>,

        /// Element attribute as name=value
        #[arg(long = "attr", value_name = "NAME=VALUE")]
        attributes: Vec<String>,

        /// JSON props payload
        #[arg(short, long)]
        props: Option<String>,

        /// Treat the children as server rendered
        #[arg(long)]
        server: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Parse { input, json, raw } => {
            let format = if raw {
                ParseFormat::Raw
            } else if json {
                ParseFormat::Json
            } else {
                ParseFormat::Html
            };
            commands::parse::run(input, format).await?;
        }
        Commands::Render {
            input,
            tag,
            adapter,
            attributes,
            props,
            server,
        } => {
            let config = config::load_config(&cli.config)?;
            let options = RenderOptions {
                tag,
                adapter,
                attributes,
                props,
                server,
            };
            commands::render::run(input, options, &config).await?;
        }
    }

    Ok(())
}
