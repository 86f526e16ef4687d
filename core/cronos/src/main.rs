//! cronos: terminal front end for focus cycles.
//!
//! ## Subcommands
//!
//! - `run`: interactive session that owns the countdown (start/stop cycles)
//! - `status`: show the active cycle and its remaining time
//! - `history`: list every cycle with its outcome

mod error;
mod logging;
mod report;
mod session;
mod title;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use cronos_core::{
    CronosEngine, CycleStore, FileSlot, HistoryOrder, PersistenceAdapter, StorageConfig,
};

use crate::error::CliError;
use crate::title::TerminalTitleSink;

#[derive(Parser)]
#[command(name = "cronos")]
#[command(about = "Single-task focus timer")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to $CRONOS_HOME, then ~/.cronos)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (resumes a running cycle)
    Run,

    /// Show the active cycle and its remaining time
    Status,

    /// List past and current cycles
    History {
        /// Show the most recent cycle first
        #[arg(long)]
        newest_first: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let storage = match cli.home {
        Some(root) => StorageConfig::with_root(root),
        None => match StorageConfig::from_env() {
            Ok(storage) => storage,
            Err(err) => {
                eprintln!("cronos: {}", err);
                std::process::exit(1);
            }
        },
    };

    let _logging_guard = logging::init(&storage.logs_dir());

    if let Err(err) = run_command(cli.command, storage) {
        tracing::error!(error = %err, "cronos command failed");
        eprintln!("cronos: {}", err);
        std::process::exit(1);
    }
}

fn run_command(command: Commands, storage: StorageConfig) -> Result<(), CliError> {
    match command {
        Commands::Run => {
            let engine = CronosEngine::open(storage, Arc::new(TerminalTitleSink::new()))?;
            let result = session::run(&engine);
            engine.shutdown();
            result
        }
        Commands::Status => {
            let store = open_read_only(&storage);
            println!("{}", report::render_status(store.active_cycle().as_ref(), Utc::now()));
            Ok(())
        }
        Commands::History { newest_first } => {
            let store = open_read_only(&storage);
            let order = if newest_first {
                HistoryOrder::NewestFirst
            } else {
                HistoryOrder::AsInserted
            };
            println!("{}", report::render_history(&store.history(order), Utc::now()));
            Ok(())
        }
    }
}

/// Opens the store without a synchronizer, so nothing is finished or rewritten.
fn open_read_only(storage: &StorageConfig) -> CycleStore {
    CycleStore::open(PersistenceAdapter::new(Arc::new(FileSlot::new(
        storage.state_dir(),
    ))))
}
