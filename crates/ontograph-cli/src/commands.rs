//! CLI command implementations.

use crate::config;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ontograph_graph::{GraphStore, ImpactSeverity, PathOutcome, RemovalImpact};
use ontograph_layout::LayoutType;
use ontograph_view::{ExportFormat, GraphSession, SessionConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Where a command gets its config and graph from. Nothing is read until
/// a command asks for a session.
pub struct Context {
    config_path: PathBuf,
    graph: Option<PathBuf>,
}

impl Context {
    pub fn new(config: Option<PathBuf>, graph: Option<PathBuf>) -> Self {
        Self {
            config_path: config.unwrap_or_else(|| config::config_path(Path::new("."))),
            graph,
        }
    }

    pub fn config(&self) -> Result<SessionConfig> {
        Ok(config::load(&self.config_path)?)
    }

    /// Opens a session on the configured graph.
    pub fn session(&self) -> Result<GraphSession> {
        let config = self.config()?;
        let session = match &self.graph {
            Some(path) => {
                debug!("Loading graph from {}", path.display());
                let json = fs::read_to_string(path)?;
                GraphSession::from_document(&json, config)?
            }
            None => GraphSession::with_config(GraphStore::synthetic()?, config),
        };
        Ok(session)
    }

    /// Whether the graph comes with its own positions.
    fn has_positions(&self) -> bool {
        self.graph.is_some()
    }
}

/// Write a default config under `path`.
pub fn init(path: &Path) -> Result<()> {
    let config_path = config::config_path(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    config::save(&config_path, &SessionConfig::default())?;

    println!("{} Initialized Ontograph in {}", "✓".green(), path.display());
    println!(
        "  Edit {} to change filters, layout forces and impact settings",
        config_path.display().to_string().cyan()
    );

    Ok(())
}

/// Print statistics for the filtered view.
pub fn stats(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.session()?;
    let stats = session.filtered_view().stats();
    let metrics = session.metrics();

    if json {
        let output = serde_json::json!({
            "stats": stats,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Ontograph Statistics".cyan().bold());
    println!("{}", "═".repeat(40));
    println!(
        "  Nodes:           {} (of {})",
        stats.node_count.to_string().cyan(),
        session.store().graph().node_count()
    );
    println!(
        "  Edges:           {} ({} unique pairs)",
        stats.edge_count.to_string().cyan(),
        stats.unique_edge_count
    );
    println!("  Density:         {:.3}", metrics.density);
    println!("  Average degree:  {:.2}", metrics.average_degree);
    if let Some(top) = &metrics.max_degree_node {
        println!(
            "  Most connected:  {} ({}) with {} connections",
            top.node.label.cyan(),
            top.node.id.dimmed(),
            top.degree
        );
    }

    if !stats.type_distribution.is_empty() {
        println!();
        println!("{}", "By type".bold());
        for (entity_type, count) in &stats.type_distribution {
            println!("  {:<16} {}", entity_type.display_name(), count);
        }
    }

    Ok(())
}

/// Search the whole store.
pub fn search(ctx: &Context, query: &str, limit: usize) -> Result<()> {
    let session = ctx.session()?;
    let matches = session.store().search(query, limit);

    if matches.is_empty() {
        println!("No matches found for \"{}\"", query);
        return Ok(());
    }

    println!("Found {} matches:\n", matches.len());

    for node in matches {
        println!(
            "  {} {} {}",
            node.entity_type.display_name().yellow(),
            node.label.cyan(),
            format!("({})", node.id).dimmed()
        );
    }

    Ok(())
}

/// Find paths between two nodes of the filtered view.
pub fn path(ctx: &Context, start: &str, end: &str, shortest: bool, json: bool) -> Result<()> {
    let mut session = ctx.session()?;
    let outcome = if shortest {
        session.shortest_path(start, end)?
    } else {
        session.find_paths(start, end)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        PathOutcome::NoPathFound => {
            println!(
                "{} No path between {} and {} within {} hops",
                "⚠".yellow(),
                start.cyan(),
                end.cyan(),
                session.config().impact.max_hops
            );
        }
        PathOutcome::Found(paths) => {
            println!(
                "{} {} path(s) from {} to {}\n",
                "✓".green(),
                paths.len(),
                start.cyan(),
                end.cyan()
            );
            for (i, path) in paths.iter().enumerate() {
                let labels: Vec<&str> = path.nodes.iter().map(|n| n.label.as_str()).collect();
                println!(
                    "  {}. {} {}",
                    i + 1,
                    labels.join(" → "),
                    format!("({} hops)", path.hops()).dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Analyze one node's removal, or rank every node by importance.
pub fn impact(ctx: &Context, target: Option<&str>, top: usize, json: bool) -> Result<()> {
    let session = ctx.session()?;

    if let Some(id) = target {
        let impact = session.analyze_removal(id)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&impact)?);
        } else {
            print_impact(&impact);
        }
        return Ok(());
    }

    let spinner = spinner("Scoring nodes...")?;
    let mut ranked = session.rank_by_importance();
    spinner.finish_and_clear();
    ranked.truncate(top);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    println!("{}", "Most important nodes".cyan().bold());
    println!("{}", "═".repeat(60));
    for (rank, impact) in ranked.iter().enumerate() {
        println!(
            "  {:>2}. {:<28} {:>5.1}  {}",
            rank + 1,
            impact.label,
            impact.importance,
            severity_label(impact.severity)
        );
    }

    Ok(())
}

fn print_impact(impact: &RemovalImpact) {
    println!(
        "{} {} {}",
        "Removal impact:".bold(),
        impact.label.cyan(),
        format!("({})", impact.id).dimmed()
    );
    println!("{}", "═".repeat(40));
    println!(
        "  Importance:      {:.1}/10 {}",
        impact.importance,
        severity_label(impact.severity)
    );
    println!("  Direct:          {}", impact.direct);
    println!("  Within 2 hops:   {}", impact.indirect);
    println!("  Paths through:   {}", impact.affected_paths);
}

fn severity_label(severity: ImpactSeverity) -> colored::ColoredString {
    let text = severity.as_str().to_uppercase();
    match severity {
        ImpactSeverity::High => text.red().bold(),
        ImpactSeverity::Medium => text.yellow(),
        ImpactSeverity::Low => text.green(),
    }
}

/// List same-type clusters of the filtered view.
pub fn clusters(ctx: &Context, json: bool) -> Result<()> {
    let session = ctx.session()?;
    let clusters = session.type_clusters();

    if json {
        println!("{}", serde_json::to_string_pretty(&clusters)?);
        return Ok(());
    }

    if clusters.is_empty() {
        println!("No clusters in the current view");
        return Ok(());
    }

    println!("Found {} clusters:\n", clusters.len());
    for cluster in &clusters {
        let shown: Vec<&str> = cluster.members.iter().take(6).map(String::as_str).collect();
        let more = cluster.len().saturating_sub(shown.len());
        println!(
            "  {} {} {}{}",
            cluster.entity_type.display_name().yellow(),
            format!("[{}]", cluster.len()).dimmed(),
            shown.join(", "),
            if more > 0 {
                format!(" ... and {} more", more)
            } else {
                String::new()
            }
        );
    }

    Ok(())
}

/// Run a layout to completion and export it.
pub fn layout(
    ctx: &Context,
    mode: LayoutType,
    center: Option<&str>,
    output: &Path,
    format: Option<ExportFormat>,
) -> Result<()> {
    let mut session = ctx.session()?;
    let format = resolve_format(output, format, ExportFormat::Svg);

    match center {
        Some(id) if mode == LayoutType::Radial => session.set_radial_center(id)?,
        Some(_) => {
            warn!("--center only applies to the radial layout");
            switch_layout(&mut session, mode);
        }
        None => switch_layout(&mut session, mode),
    }

    let spinner = spinner(&format!("Running {} layout...", mode))?;
    let mut frames = 1;
    while session.tick() {
        frames += 1;
        if frames % 25 == 0 {
            spinner.set_message(format!("Running {} layout... frame {}", mode, frames));
        }
    }
    spinner.finish_and_clear();

    println!(
        "{} {} layout settled after {} frames ({} nodes)",
        "✓".green(),
        mode.to_string().cyan(),
        frames,
        session.view().node_count()
    );

    session.export_to(output, format)?;
    println!("{} Exported {} to {}", "✓".green(), format, output.display());

    Ok(())
}

/// Export the filtered view. The built-in ontology has no positions, so it
/// is laid out first.
pub fn export(ctx: &Context, output: &Path, format: Option<ExportFormat>) -> Result<()> {
    let mut session = ctx.session()?;
    let format = resolve_format(output, format, ExportFormat::Json);

    if !ctx.has_positions() {
        let frames = session.settle();
        debug!("Laid out the built-in graph in {} frames", frames);
    }

    session.export_to(output, format)?;
    println!(
        "{} Exported {} nodes to {}",
        "✓".green(),
        session.view().node_count().to_string().cyan(),
        output.display()
    );

    Ok(())
}

fn switch_layout(session: &mut GraphSession, mode: LayoutType) {
    if session.mode() != mode {
        session.set_layout(mode);
    }
}

fn resolve_format(output: &Path, format: Option<ExportFormat>, fallback: ExportFormat) -> ExportFormat {
    format
        .or_else(|| ExportFormat::from_path(output))
        .unwrap_or(fallback)
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    Ok(spinner)
}
