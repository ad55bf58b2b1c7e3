//! Nexus Explorer command line
//!
//! Drives a headless session against the graph backend.
//!
//! # Usage
//!
//! ```bash
//! # Load the snapshot and print a summary
//! nexus snapshot
//!
//! # Inspect an entity (same path as tapping its node)
//! nexus inspect "Acme Corp"
//!
//! # Tap whatever lies at a viewport position
//! nexus pick 640 400
//!
//! # Inspect the relationship between two entities
//! nexus edge "Acme Corp" Globex
//!
//! # Search by name or alias
//! nexus --api-base http://graph.internal:8099 search acme
//!
//! # Export the view / snapshot
//! nexus export-png
//! nexus export-json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use egui::Pos2;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexus_explorer::config::{API_BASE_ENV_VAR, CONFIG_ENV_VAR};
use nexus_explorer::export::{export_json, export_png};
use nexus_explorer::panel::render_text;
use nexus_explorer::{
    DataGateway, ExplorerConfig, GestureKind, HttpGraphApi, InteractionEvent,
    InteractionOrchestrator, Resolution, Session, Target,
};
use nexus_graph::{GraphSurface, HeadlessSurface};
use nexus_types::GraphEdge;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(version)]
#[command(about = "Explore a knowledge graph from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Graph backend base URL
    #[arg(long, global = true, env = API_BASE_ENV_VAR)]
    api_base: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the snapshot and print counts
    Snapshot,

    /// Show an entity's detail panel
    Inspect {
        /// Canonical name or alias
        name: String,
    },

    /// Show the relationship panel for two entities
    Edge { src: String, tgt: String },

    /// Tap the node or edge at a viewport position (pixels from the top left)
    Pick { x: f32, y: f32 },

    /// Submit a search and report where it landed
    Search { term: String },

    /// Write the loaded snapshot as JSON
    ExportJson,

    /// Write the current view as PNG
    ExportPng,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexus_explorer=info,nexus_graph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config =
        ExplorerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    config.validate()?;
    tracing::info!(api_base = %config.api_base, "starting explorer session");

    let api = HttpGraphApi::new(&config.api_base).context("failed to create API client")?;
    let gateway = DataGateway::new(api);
    let surface = HeadlessSurface::new(config.surface.width, config.surface.height);
    let mut session = Session::new(surface, &config);

    if let Err(e) = session.load_snapshot(&gateway).await {
        print_notification(&session);
        tracing::debug!(error = %e, "snapshot load failed");
        return Ok(ExitCode::FAILURE);
    }

    let mut orchestrator = InteractionOrchestrator::new();
    let now = chrono::Utc::now();

    match cli.command {
        Commands::Snapshot => {
            let snapshot = session
                .snapshot()
                .context("snapshot missing after load")?;
            if let Some(meta) = &snapshot.meta {
                println!("Generated: {}", meta.generated_at);
            }
            println!("Nodes: {}", snapshot.nodes.len());
            println!(
                "Edges: {} ({} rendered)",
                snapshot.edges.len(),
                session.surface().edge_ids().len()
            );
        }
        Commands::Inspect { name } => {
            let event = InteractionEvent::tap(Target::Node(name));
            let resolution = orchestrator.handle(&mut session, &gateway, &event).await;
            return Ok(report(&session, resolution));
        }
        Commands::Edge { src, tgt } => {
            let edge_id = session
                .snapshot()
                .and_then(|s| s.edge_between(&src, &tgt))
                .map(|e| e.id.clone())
                .unwrap_or_else(|| GraphEdge::pair_id(&src, &tgt));
            let event = InteractionEvent::tap(Target::Edge(edge_id));
            let resolution = orchestrator.handle(&mut session, &gateway, &event).await;
            if resolution.is_none() {
                eprintln!("No edge between \"{}\" and \"{}\" in the graph.", src, tgt);
                return Ok(ExitCode::FAILURE);
            }
            return Ok(report(&session, resolution));
        }
        Commands::Pick { x, y } => {
            let event = session.pointer_event(GestureKind::Tap, Pos2::new(x, y));
            if let InteractionEvent::Pointer {
                target: Target::Background,
                ..
            } = &event
            {
                eprintln!("Nothing at ({}, {}).", x, y);
                return Ok(ExitCode::FAILURE);
            }
            let resolution = orchestrator.handle(&mut session, &gateway, &event).await;
            return Ok(report(&session, resolution));
        }
        Commands::Search { term } => {
            session.set_search_field(term.clone());
            let event = InteractionEvent::SearchSubmit(term);
            let resolution = orchestrator.handle(&mut session, &gateway, &event).await;
            println!("Search field: {}", session.search_field());
            println!("Selection: {:?}", session.selection_state());
            return Ok(report(&session, resolution));
        }
        Commands::ExportJson => {
            let path = export_json(&session, &config, now)?;
            println!("{}", path.display());
        }
        Commands::ExportPng => {
            let path = export_png(&session, &config, now)?;
            println!("{}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn report(session: &Session<HeadlessSurface>, resolution: Option<Resolution>) -> ExitCode {
    print_notification(session);
    match resolution {
        Some(Resolution::Applied) => {
            println!("{}", render_text(session.panel().view()));
            ExitCode::SUCCESS
        }
        _ => ExitCode::FAILURE,
    }
}

fn print_notification(session: &Session<HeadlessSurface>) {
    if let Some(notification) = session.notifications().visible() {
        eprintln!(
            "[{}] {}",
            notification.severity.as_str(),
            notification.message
        );
    }
}
