// src/main.rs

use clap::Parser;
use search_scope::core::{
    ConfigError, CoreScopeConfigManager, FileSystemRootCandidates, ScopeConfig,
    ScopeConfigManagerOperations, ScopeError, ScopeWalker, SearchScope, WalkError,
};
use search_scope::{APP_NAME, initialize_logging_with_level};
use simplelog::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

/// List the files of a workspace that belong to a search scope.
///
/// Roots are reduced to a minimal non-overlapping set, file names are filtered
/// by glob patterns (prefix a pattern with `!` to exclude), and derived output
/// directories are skipped unless `--include-derived` is given.
#[derive(Parser, Debug)]
#[command(name = "search_scope")]
#[command(version, about)]
struct Args {
    /// Workspace directory that scope paths are relative to.
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Scope definition file (JSON). Defaults to scope.json in the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root to search, relative to the workspace. Repeatable; overrides the config roots.
    #[arg(long = "root")]
    roots: Vec<String>,

    /// File name pattern. Repeatable; overrides the config patterns.
    #[arg(long = "pattern", allow_hyphen_values = true)]
    patterns: Vec<String>,

    /// Include derived resources and everything beneath them.
    #[arg(long)]
    include_derived: bool,

    /// Worker threads for the parallel walk (0 picks automatically).
    #[arg(long)]
    threads: Option<usize>,

    /// Walk on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Print the effective scope configuration as JSON and exit.
    #[arg(long)]
    show_config: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),
}

fn effective_config(args: &Args) -> Result<ScopeConfig, CliError> {
    let manager = CoreScopeConfigManager::new();
    let mut config = match &args.config {
        Some(path) => manager.load_config(path)?,
        None => manager.load_default_config(APP_NAME).unwrap_or_else(|e| {
            log::warn!("Main: Ignoring default config: {e}");
            ScopeConfig::default()
        }),
    };

    if !args.roots.is_empty() {
        config.roots = args.roots.clone();
    }
    if !args.patterns.is_empty() {
        config.file_name_patterns = Some(args.patterns.clone());
    }
    if args.include_derived {
        config.include_derived = true;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = effective_config(args)?;
    if args.show_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let provider = FileSystemRootCandidates::new(
        &args.workspace,
        config.root_paths(),
        config.derived_markers(),
    );
    let scope = SearchScope::from_provider(
        &provider,
        config.file_name_patterns.clone(),
        config.include_derived,
    )?;
    let walker = ScopeWalker::new(&args.workspace, config.derived_markers());

    let members = if args.sequential {
        walker.walk_sequential(&scope)?
    } else {
        walker.walk_parallel(&scope, config.threads)?
    };
    for member in &members {
        println!("{}", walker.filesystem_path(member).display());
    }
    log::info!("Main: {} files in scope.", members.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    initialize_logging_with_level(level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Main: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
