//! Ontograph CLI - explore the shipping ontology from a terminal.
//!
//! Every command works on a filtered view: the built-in synthetic ontology
//! by default, or an exported JSON document passed with `--graph`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use ontograph_layout::LayoutType;
use ontograph_view::ExportFormat;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::Context;

#[derive(Parser)]
#[command(name = "ontograph")]
#[command(author = "Ontograph Contributors")]
#[command(version)]
#[command(about = "Explore and lay out a shipping ontology graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .ontograph/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Load an exported JSON graph instead of the built-in ontology
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config in the given directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show node, edge and type statistics for the filtered view
    Stats {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Search nodes by id, label or property value
    Search {
        /// Search query
        query: String,

        /// Maximum results to return
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },

    /// Find paths between two nodes
    Path {
        /// Start node id
        start: String,

        /// End node id
        end: String,

        /// Only report the shortest path
        #[arg(long)]
        shortest: bool,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Estimate the impact of removing a node, or rank all nodes
    Impact {
        /// Node to analyze; omit to rank every node
        target: Option<String>,

        /// How many ranked nodes to show
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List same-type clusters
    Clusters {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Run a layout and export the result
    Layout {
        /// Layout mode: force, radial, hierarchical, circular or grid
        #[arg(short, long, default_value = "force")]
        mode: LayoutType,

        /// Center node for the radial layout
        #[arg(long)]
        center: Option<String>,

        /// Output file
        #[arg(short, long, default_value = "ontograph-layout.svg")]
        output: PathBuf,

        /// Output format (inferred from the file extension when omitted)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Export the filtered view with its current positions
    Export {
        /// Output file
        #[arg(short, long, default_value = "ontograph-graph.json")]
        output: PathBuf,

        /// Output format (inferred from the file extension when omitted)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let ctx = Context::new(cli.config, cli.graph);
    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Stats { json } => commands::stats(&ctx, json),
        Commands::Search { query, limit } => commands::search(&ctx, &query, limit),
        Commands::Path {
            start,
            end,
            shortest,
            json,
        } => commands::path(&ctx, &start, &end, shortest, json),
        Commands::Impact { target, top, json } => {
            commands::impact(&ctx, target.as_deref(), top, json)
        }
        Commands::Clusters { json } => commands::clusters(&ctx, json),
        Commands::Layout {
            mode,
            center,
            output,
            format,
        } => commands::layout(&ctx, mode, center.as_deref(), &output, format),
        Commands::Export { output, format } => commands::export(&ctx, &output, format),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
