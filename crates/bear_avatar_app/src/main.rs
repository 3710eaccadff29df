// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bear avatar console.
//!
//! Drives the login avatar sequencer outside a browser:
//! - Print the frame catalog discovered in an asset directory
//! - Replay a scripted login session on a virtual or wall clock
//! - Type form events interactively, with optional asset hot-reload

mod assets;
mod driver;
mod error;
mod login;
mod script;
mod watch;

use assets::DirectoryAssetSource;
use bear_avatar_sequencer::{FrameCatalog, Sequencer, SequencerConfig, CONFIG_FILE_NAME};
use clap::{Parser, Subcommand, ValueEnum};
use error::Result;
use login::LoginForm;
use script::Script;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bear_avatar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Focus-driven bear avatar sequencer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Sequencer config file (RON); defaults to ./bear_avatar.ron when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the bear frame images
    #[arg(short, long, global = true, default_value = "assets/img")]
    assets: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sorted frame catalog
    Catalog {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = CatalogFormat::Ron)]
        format: CatalogFormat,
    },

    /// Replay a scripted login session
    Replay {
        /// Script file (RON)
        script: PathBuf,

        /// Sleep between frames instead of running on a virtual clock
        #[arg(short, long)]
        realtime: bool,
    },

    /// Read form events from stdin
    Interactive {
        /// Reload the catalog when frame images change
        #[arg(short, long)]
        watch: bool,
    },

    /// Write the default configuration
    InitConfig {
        /// Output path
        #[arg(default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CatalogFormat {
    Ron,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bear_avatar_app={default_level},bear_avatar_sequencer={default_level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    tracing::debug!("Starting bear_avatar v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SequencerConfig> {
    if let Some(path) = path {
        return Ok(SequencerConfig::load(path)?);
    }
    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.is_file() {
        return Ok(SequencerConfig::load(default_path)?);
    }
    Ok(SequencerConfig::default())
}

fn open_assets(dir: &Path, config: &SequencerConfig) -> Result<(DirectoryAssetSource, FrameCatalog)> {
    let source = DirectoryAssetSource::open(dir)?;
    let catalog = source.load_catalog(&config.patterns);
    if catalog.is_empty() {
        tracing::warn!("No frame images found under {:?}", source.root());
    }
    Ok((source, catalog))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::InitConfig { path } => {
            SequencerConfig::default().save(&path)?;
            tracing::info!("Wrote default configuration to {:?}", path);
            Ok(())
        }
        Commands::Catalog { format } => {
            let config = load_config(cli.config.as_deref())?;
            let (_, catalog) = open_assets(&cli.assets, &config)?;
            print_catalog(&catalog, format)
        }
        Commands::Replay { script, realtime } => {
            let config = load_config(cli.config.as_deref())?;
            let (_, catalog) = open_assets(&cli.assets, &config)?;
            let script = Script::load(&script)?;

            let mut sequencer = Sequencer::new(&config);
            driver::log_frames(&mut sequencer);
            sequencer.load_catalog(catalog);
            driver::replay(&mut sequencer, &mut LoginForm::new(), &script, realtime);
            Ok(())
        }
        Commands::Interactive { watch } => {
            let config = load_config(cli.config.as_deref())?;
            let (source, catalog) = open_assets(&cli.assets, &config)?;

            let mut sequencer = Sequencer::new(&config);
            driver::log_frames(&mut sequencer);
            sequencer.load_catalog(catalog);

            let (tx, rx) = mpsc::channel();
            let _watcher = if watch {
                let reload_tx = tx.clone();
                Some(watch::CatalogWatcher::new(
                    source,
                    config.patterns.clone(),
                    watch::DEFAULT_DEBOUNCE,
                    move |catalog| {
                        let _ = reload_tx.send(driver::Command::Reload(catalog));
                    },
                )?)
            } else {
                None
            };
            // Not joined: a blocked stdin read cannot be interrupted.
            driver::spawn_stdin_reader(tx);

            driver::interactive(&mut sequencer, &mut LoginForm::new(), &rx);
            Ok(())
        }
    }
}

fn print_catalog(catalog: &FrameCatalog, format: CatalogFormat) -> Result<()> {
    let output = match format {
        CatalogFormat::Ron => {
            ron::ser::to_string_pretty(catalog, ron::ser::PrettyConfig::default())?
        }
        CatalogFormat::Json => serde_json::to_string_pretty(catalog)?,
    };
    println!("{output}");
    Ok(())
}
