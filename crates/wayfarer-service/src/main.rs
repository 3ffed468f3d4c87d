//! Wayfarer - Main entry point

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfarer_domain::{ExportSnapshot, PlaceMatcher, PlaceRecord};
use wayfarer_service::{
    serve_stdio, spawn_store_actor, Cli, Command, ImportReport, Request, StoreHandle, WayfarerConfig,
};
use wayfarer_store::{PlaceStats, PlaceStore, SqliteBackend};

const DEFAULT_CONFIG_FILE: &str = "wayfarer.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.path = db;
    }

    // Logs go to stderr; stdout carries responses in serve mode
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level.0))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let backend = SqliteBackend::open(&config.storage.path).with_context(|| {
        format!("Failed to open database {}", config.storage.path.display())
    })?;
    let store = PlaceStore::open_with_matcher(backend, PlaceMatcher::new(config.matching))?;
    info!(path = %config.storage.path.display(), "Opened place store");

    let (handle, task) = spawn_store_actor(store, config.service.channel_capacity);

    let result = execute(cli.command.unwrap_or(Command::Serve), &handle).await;

    handle.shutdown().await;
    task.await.context("Store actor panicked")?;

    result
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WayfarerConfig> {
    match path {
        Some(path) => WayfarerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(WayfarerConfig::from_file(DEFAULT_CONFIG_FILE)?)
        }
        None => Ok(WayfarerConfig::default()),
    }
}

async fn execute(command: Command, handle: &StoreHandle) -> anyhow::Result<()> {
    match command {
        Command::Serve => {
            serve_stdio(handle.clone()).await?;
        }
        Command::Export(args) => {
            let snapshot: ExportSnapshot = handle.call(Request::ExportData).await?;
            let output = args.output.unwrap_or_else(default_export_path);
            let json = serde_json::to_string_pretty(&snapshot)?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Exported {} todo and {} visited places to {}",
                snapshot.todo_places.len(),
                snapshot.visited_places.len(),
                output.display()
            );
        }
        Command::Import(args) => {
            let text = std::fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let data: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
            let report: ImportReport = handle.call(Request::ImportData { data }).await?;
            println!("{}", report.summary());
        }
        Command::Stats => {
            let stats: PlaceStats = handle.call(Request::GetStats).await?;
            println!("To visit: {}", stats.todo_count);
            println!("Visited:  {}", stats.visited_count);
        }
        Command::List(args) => {
            let request = if args.visited {
                Request::GetVisitedPlaces
            } else {
                Request::GetTodoPlaces
            };
            let places: Vec<PlaceRecord> = handle.call(request).await?;
            if places.is_empty() {
                println!("No places.");
            }
            for place in places {
                print_place(&place);
            }
        }
        Command::Clear(args) => {
            if !args.yes {
                bail!("Refusing to erase all places without --yes");
            }
            handle.call::<()>(Request::ClearAll).await?;
            println!("All places and settings erased.");
        }
    }

    Ok(())
}

fn default_export_path() -> PathBuf {
    PathBuf::from(format!("wayfarer-{}.json", Utc::now().format("%Y-%m-%d")))
}

fn print_place(record: &PlaceRecord) {
    let when = record.visited_at.unwrap_or(record.added_at);
    match &record.place.address {
        Some(address) => println!(
            "{}  [{}]  {}  ({})  {}",
            record.id,
            record.status(),
            record.place.name,
            address,
            when.format("%Y-%m-%d")
        ),
        None => println!(
            "{}  [{}]  {}  {}",
            record.id,
            record.status(),
            record.place.name,
            when.format("%Y-%m-%d")
        ),
    }
}
