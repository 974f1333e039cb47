//! awf CLI - Main entry point

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "awf")]
#[command(version)]
#[command(about = "Agentic workflow compiler front-end", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workflow's frontmatter and its includes
    Validate {
        /// Workflow markdown file
        file: PathBuf,

        /// Validate against the included-file schema instead
        #[arg(long)]
        included: bool,

        /// Emit diagnostics as JSON lines on stderr
        #[arg(long)]
        json: bool,
    },

    /// Expand @include directives in a workflow body
    Expand {
        /// Workflow markdown file
        file: PathBuf,

        /// Print the merged tools configuration instead of markdown
        #[arg(long)]
        tools: bool,

        /// Maximum number of expansion passes
        #[arg(long, default_value_t = awf_include::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Emit notes as JSON lines on stderr
        #[arg(long)]
        json: bool,
    },

    /// Print the source span of a frontmatter path
    Locate {
        /// Workflow markdown file
        file: PathBuf,

        /// Path such as `tools.github.allowed[0]`, or a JSON pointer with --pointer
        path: String,

        /// Treat PATH as a JSON pointer (`/tools/github`)
        #[arg(long)]
        pointer: bool,
    },

    /// Print the MCP servers a workflow configures, as JSON
    Mcp {
        /// Workflow markdown file
        file: PathBuf,

        /// Only this server
        #[arg(long)]
        server: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Validate { file, included, json } => {
            commands::validate::execute(commands::validate::ValidateArgs { file, included, json })
        }
        Commands::Expand {
            file,
            tools,
            max_depth,
            json,
        } => commands::expand::execute(commands::expand::ExpandArgs {
            file,
            tools,
            max_depth,
            json,
        }),
        Commands::Locate { file, path, pointer } => {
            commands::locate::execute(commands::locate::LocateArgs { file, path, pointer })
        }
        Commands::Mcp { file, server } => commands::mcp::execute(commands::mcp::McpArgs { file, server }),
    }
}
