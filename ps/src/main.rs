use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use progressstore::cli::{Cli, Command};
use progressstore::config::Config;
use progressstore::{FileStorage, ProgressStore, SyncStatus};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn open_store(config: &Config) -> Result<ProgressStore<FileStorage>> {
    let storage = FileStorage::open(&config.store_path)?;
    let mut store = ProgressStore::new(storage)
        .with_total_nodes(config.total_nodes)
        .with_storage_key(&config.storage_key);
    if let SyncStatus::Failed(e) = store.load() {
        eprintln!("{} starting from empty progress: {}", "warning:".yellow(), e);
    }
    Ok(store)
}

fn check_saved(status: SyncStatus) {
    if let SyncStatus::Failed(e) = status {
        eprintln!("{} progress not persisted: {}", "warning:".yellow(), e);
    }
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("progressstore starting");

    match cli.command {
        Command::Mark { id } => {
            let mut store = open_store(&config)?;
            check_saved(store.mark_completed(id.clone()));
            println!("{} Marked completed: {}", "✓".green(), id.cyan());
        }
        Command::Unmark { id } => {
            let mut store = open_store(&config)?;
            check_saved(store.unmark_completed(&id));
            println!("{} Unmarked: {}", "✓".green(), id.cyan());
        }
        Command::List => {
            let store = open_store(&config)?;
            if store.completed_count() == 0 {
                println!("No items completed yet");
            } else {
                for id in store.completed_ids() {
                    println!("{}", id);
                }
            }
        }
        Command::Stats => {
            let store = open_store(&config)?;
            println!("Completed: {}", store.completed_count());
            println!("Progress: {}%", store.progress_percent());
        }
        Command::Reset => {
            let mut store = open_store(&config)?;
            check_saved(store.reset());
            println!("{} Progress cleared", "✓".green());
        }
        Command::Export { output } => {
            let store = open_store(&config)?;
            let snapshot = store.export_snapshot();
            match output {
                Some(path) => {
                    std::fs::write(&path, &snapshot)
                        .context(format!("Failed to write snapshot to {}", path.display()))?;
                    println!("{} Exported to {}", "✓".green(), path.display().to_string().cyan());
                }
                None => println!("{}", snapshot),
            }
        }
        Command::Import { file } => {
            let mut store = open_store(&config)?;
            let text =
                std::fs::read_to_string(&file).context(format!("Failed to read snapshot from {}", file.display()))?;
            if store.import_snapshot(&text) {
                println!(
                    "{} Imported {} completed items",
                    "✓".green(),
                    store.completed_count().to_string().cyan()
                );
            } else {
                return Err(eyre::eyre!("Snapshot did not parse; progress left unchanged"));
            }
        }
    }

    Ok(())
}
