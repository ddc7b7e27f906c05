pub mod config;
pub mod debounce;
pub mod model;
pub mod search;
pub mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::TypeaheadConfig;
use model::types::Film;
use search::remote::RpcSearchClient;
use search::{SearchController, SearchState};
use ui::view::ResultItem;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "typeahead",
    version,
    about = "Debounced type-ahead search over a remote film index"
)]
pub struct Cli {
    /// Search endpoint base URL (overrides TYPEAHEAD_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive type-ahead
    Tui {
        /// Settle delay before a query is sent
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Run a single lookup and print the matches
    Search {
        term: String,

        /// Print raw records as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TypeaheadConfig::from_env();
    if let Some(url) = cli.api_url {
        config.remote.base_url = Some(url);
    }

    match cli.command {
        Commands::Tui { debounce_ms } => {
            if let Some(ms) = debounce_ms {
                config.controller.debounce = Duration::from_millis(ms);
            }
            let _guard = init_file_logging()?;
            ui::tui::run_tui(config).await
        }
        Commands::Search { term, json } => {
            init_stderr_logging();
            run_search(config, &term, json).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "typeahead", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

/// One lookup through the same controller the TUI uses, without the wait.
async fn run_search(mut config: TypeaheadConfig, term: &str, json: bool) -> Result<()> {
    let client = RpcSearchClient::<Film>::new(&config.remote)
        .context("TYPEAHEAD_API_URL (or --api-url) must point at the search endpoint")?;
    config.controller.debounce = Duration::ZERO;
    let mut controller = SearchController::new(client, config.controller);

    controller.set_input(term);
    controller.run_until_quiet().await;

    match controller.state() {
        SearchState::HasResults(films) => {
            if json {
                println!("{}", serde_json::to_string_pretty(films)?);
            } else {
                for film in films {
                    for line in film.card().lines() {
                        println!("{line}");
                    }
                    println!();
                }
            }
        }
        SearchState::Empty => {
            if json {
                println!("[]");
            } else {
                println!("{}", ui::view::NOTHING_FOUND_TEXT);
            }
        }
        SearchState::Failed { message } => bail!("search failed: {message}"),
        SearchState::Idle => eprintln!("Nothing to search for"),
        SearchState::Searching => bail!("search did not complete"),
    }
    Ok(())
}

fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so its logs go to a daily file.
fn init_file_logging() -> Result<WorkerGuard> {
    let dir = default_data_dir().join("logs");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(&dir, "typeahead.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();
    Ok(guard)
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "typeahead", "typeahead")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("typeahead"))
}
