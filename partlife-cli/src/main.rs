//! Partlife CLI Tool
//!
//! Command-line interface for tracking wear of replaceable machine parts:
//! listing and filtering the inventory, recording installs and replacements,
//! exporting a health report and asking the maintenance advisor.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use partlife::advisory::{AdvisorSession, GeminiAdvisor};
use partlife::health::HealthSummary;
use partlife::persistence::open_gateway;
use partlife::{
    report, seed, Clock, Facet, FilterSelection, InventoryStore, Part, PartDraft, PartId,
    PartlifeConfig, SystemClock,
};
use partlife_cli::draft_args::DraftArgs;
use partlife_cli::render;

#[derive(Parser)]
#[command(name = "partlife")]
#[command(about = "Track wear of replaceable machine parts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (default: config/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List parts with their health
    List {
        /// Only parts on this machine ("all" for every machine)
        #[arg(long, default_value = "all")]
        machine: String,

        /// Only parts with this exact name ("all" for every name)
        #[arg(long, default_value = "all")]
        part: String,
    },

    /// List distinct machine ids
    Machines,

    /// List distinct part names
    Names,

    /// Add a part
    Add {
        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Edit every field of an existing part except its id
    Edit {
        id: String,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Deploy a copy of an existing part, usually on another machine
    #[command(name = "clone")]
    CloneFrom {
        /// Part to copy name, category, lifespan and notes from
        source: String,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Record that a part was replaced today
    Replace { id: String },

    /// Count parts by status
    Summary,

    /// Write a CSV health report
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Ask the maintenance advisor a question
    Advise {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    } else if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PartlifeConfig::load_from(path),
        None => PartlifeConfig::load(),
    }
    .context("failed to load configuration")?;
    log::debug!("Configuration: {:?}", config);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let gateway = open_gateway(&config.storage).context("failed to open inventory storage")?;
    let seed_fn: fn(DateTime<Utc>) -> Vec<Part> = if config.seed_on_empty {
        seed::default_parts
    } else {
        seed::empty
    };
    let mut store = InventoryStore::bootstrap(gateway, clock.clone(), seed_fn);

    match cli.command {
        Commands::List { machine, part } => {
            let selection = FilterSelection::new(Facet::parse(&machine), Facet::parse(&part));
            handle_list(&store, &selection, cli.json)
        }
        Commands::Machines => print_values(&store.view().machines(), cli.json),
        Commands::Names => print_values(&store.view().part_names(), cli.json),
        Commands::Add { fields } => {
            let mut draft = PartDraft::new_for(&FilterSelection::default(), store.now());
            fields.apply(&mut draft);
            let part = store.add(draft)?;
            ensure_saved(&store)?;
            print_part(&store, &part.id, "Added", cli.json)
        }
        Commands::Edit { id, fields } => {
            let id = PartId::from(id);
            let mut draft = match store.get(&id) {
                Some(part) => PartDraft::from_part(part),
                None => bail!("Part not found: {}", id),
            };
            fields.apply(&mut draft);
            store.edit(&id, draft)?;
            ensure_saved(&store)?;
            print_part(&store, &id, "Updated", cli.json)
        }
        Commands::CloneFrom { source, fields } => {
            let source = PartId::from(source);
            let mut draft = store.clone_draft(&source)?;
            fields.apply(&mut draft);
            let part = store.clone_part(&source, draft)?;
            ensure_saved(&store)?;
            print_part(&store, &part.id, "Cloned", cli.json)
        }
        Commands::Replace { id } => {
            let part = store.replace(&PartId::from(id))?;
            ensure_saved(&store)?;
            print_part(&store, &part.id, "Replaced", cli.json)
        }
        Commands::Summary => handle_summary(&store, cli.json),
        Commands::Export { output } => handle_export(&store, output),
        Commands::Advise { query } => {
            let query = query.join(" ");
            let advisor = GeminiAdvisor::new(config.advisory.clone());
            let mut session = AdvisorSession::new(clock);
            let reply = session.ask(&advisor, store.list(), &store.health(), &query);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(reply)?);
            } else {
                println!("{}", reply.text);
            }
            Ok(())
        }
    }
}

/// A save failure leaves the change only in this process's memory, which
/// ends with the command, so it is reported as a failure.
fn ensure_saved(store: &InventoryStore) -> Result<()> {
    if let Some(e) = store.last_persistence_error() {
        bail!("change was not saved: {}", e);
    }
    Ok(())
}

fn handle_list(store: &InventoryStore, selection: &FilterSelection, json: bool) -> Result<()> {
    let view = store.view();
    let parts = view.apply(selection);
    let health = store.health();

    if json {
        println!("{}", serde_json::to_string_pretty(&render::reports(&parts, &health))?);
        return Ok(());
    }

    if let Some(reason) = view.empty_reason(&parts) {
        println!("{}", render::empty_message(reason));
        return Ok(());
    }
    for part in parts {
        println!("{}", render::part_line(part, health.get(&part.id)));
    }
    Ok(())
}

fn print_values(values: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
    } else {
        for value in values {
            println!("{}", value);
        }
    }
    Ok(())
}

fn print_part(store: &InventoryStore, id: &PartId, verb: &str, json: bool) -> Result<()> {
    let Some(part) = store.get(id) else {
        bail!("Part not found: {}", id);
    };
    let health = store.health();
    if json {
        let report = render::reports(&[part], &health);
        println!("{}", serde_json::to_string_pretty(&report[0])?);
    } else {
        println!("{} {}", verb.green(), render::part_line(part, health.get(id)));
    }
    Ok(())
}

fn handle_summary(store: &InventoryStore, json: bool) -> Result<()> {
    let summary = HealthSummary::from_map(&store.health());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in render::summary_lines(&summary) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn handle_export(store: &InventoryStore, output: Option<PathBuf>) -> Result<()> {
    let rows = report::health_rows(store.list(), store.now());
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            report::write_csv(file, &rows)?;
            log::info!("Wrote {} row(s) to {}", rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            report::write_csv(&mut lock, &rows)?;
            lock.flush()?;
        }
    }
    Ok(())
}
