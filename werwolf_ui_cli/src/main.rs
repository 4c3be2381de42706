mod cli;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use log::{info, LevelFilter};
use werwolf_core::{open_store, storage::FileStorage};

use crate::cli::{AlertPrinter, Cli};

/// Moderator companion for the party game Werewolf
#[derive(Parser, Debug)]
#[command(name = "werwolf", version, about, long_about = None)]
struct Config {
    /// Directory holding the saved custom roles
    #[arg(long, env = "WERWOLF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Seed for the first deal, later deals count up from it
    #[arg(long)]
    seed: Option<u64>,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Config {
    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from("", "", "werwolf")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".werwolf"))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let data_dir = config.data_dir();
    info!("Using data directory {}", data_dir.display());

    let storage = Arc::new(FileStorage::new(&data_dir));
    let store = open_store(storage, Arc::new(AlertPrinter))
        .await
        .with_context(|| format!("failed to load custom roles from {}", data_dir.display()))?;

    Cli::new(store, config.seed)
        .run()
        .await
        .context("terminal input failed")
}
