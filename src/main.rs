// Folder Merger
// Command-line front end with a terminal progress view

// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use folder_merger::core::{App, AppConfig, MergeDefaults};
use folder_merger::operations::{spawn_merge, MergeEngine, MergeHandle};
use folder_merger::{
    ui, MergeConfig, MergeError, MergeEvent, MergeProfile, Summary, DEFAULT_PROFILE_NAME,
};

//--------------------------------------------------------<<

#[derive(Parser, Debug)]
#[command(
    name = "folder-merger",
    version,
    about = "Move the contents of many folders into one target folder"
)]
struct Args {
    /// Source folders, merged in the order given
    sources: Vec<PathBuf>,

    /// Folder that receives the files
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Merge profile to load (defaults to ./folder-merger.yaml if present)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Give conflicting files a numbered name
    #[arg(long, overrides_with = "no_rename")]
    rename: bool,

    /// Stop with an error when a destination already exists
    #[arg(long, overrides_with = "rename")]
    no_rename: bool,

    /// Remove source folders the merge leaves empty
    #[arg(long, overrides_with = "keep_empty")]
    delete_empty: bool,

    /// Leave emptied source folders in place
    #[arg(long, overrides_with = "delete_empty")]
    keep_empty: bool,

    /// Mirror each source folder's subdirectories under the target
    #[arg(long, overrides_with = "flatten")]
    preserve_structure: bool,

    /// Put every file directly in the target folder
    #[arg(long, overrides_with = "preserve_structure")]
    flatten: bool,

    /// Write a merge_log_<timestamp>.txt file
    #[arg(long, overrides_with = "no_log")]
    log: bool,

    /// Do not write a move log
    #[arg(long, overrides_with = "log")]
    no_log: bool,

    /// Directory for the move log
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Show what would be moved without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Print progress lines instead of the full-screen view
    #[arg(long)]
    plain: bool,

    /// Save the effective settings as a merge profile
    #[arg(long, value_name = "FILE")]
    save_profile: Option<PathBuf>,
}

/// Resolve a `--flag` / `--no-flag` pair
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.plain || args.dry_run);

    let app_config = AppConfig::default();
    let config = build_config(&args, &app_config.defaults)?;

    if let Some(path) = &args.save_profile {
        MergeProfile::from_config(&config, &app_config.defaults)?.save(path)?;
        info!("Saved merge profile to {}", path.display());
    }

    let engine = MergeEngine::new(config.clone());

    if args.dry_run {
        return print_plan(&engine);
    }

    let runtime = Runtime::new().context("Failed to start merge runtime")?;
    let _guard = runtime.enter();

    let handle = spawn_merge(engine)?;
    let outcome = if args.plain {
        runtime.block_on(watch_plain(handle))
    } else {
        run_tui(&app_config, &config, handle, &runtime)?
    };

    report(outcome)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();
}

// CONFIGURATION ------------------>>

/// Layer compiled defaults, the merge profile and command-line flags
fn build_config(args: &Args, defaults: &MergeDefaults) -> Result<MergeConfig> {
    let mut profile = match &args.profile {
        Some(path) => MergeProfile::load(path)?,
        None => MergeProfile::load_optional(Path::new(DEFAULT_PROFILE_NAME))?.unwrap_or_default(),
    };

    if !args.sources.is_empty() {
        profile.sources = args
            .sources
            .iter()
            .filter(|path| {
                let is_dir = path.is_dir();
                if !is_dir {
                    warn!("Skipping {}: not a folder", path.display());
                }
                is_dir
            })
            .cloned()
            .collect();
    }
    if let Some(target) = &args.target {
        profile.target = Some(target.clone());
    }

    let options = &mut profile.options;
    if let Some(value) = flag(args.rename, args.no_rename) {
        options.rename_on_conflict = Some(value);
    }
    if let Some(value) = flag(args.delete_empty, args.keep_empty) {
        options.delete_empty_sources = Some(value);
    }
    if let Some(value) = flag(args.preserve_structure, args.flatten) {
        options.preserve_structure = Some(value);
    }
    if let Some(value) = flag(args.log, args.no_log) {
        options.write_log = Some(value);
    }
    if let Some(dir) = &args.log_dir {
        options.log_dir = Some(dir.clone());
    }

    Ok(profile.to_config(defaults))
}

//--------------------------------------------------------<<
// RUN MODES ------------------>>

fn print_plan(engine: &MergeEngine) -> Result<()> {
    let moves = engine.plan()?;
    for record in &moves {
        println!(
            "Would move: {} -> {}",
            record.source.display(),
            record.destination.display()
        );
    }
    println!(
        "{} file(s) would be moved into {}",
        moves.len(),
        engine.config().target().display()
    );
    Ok(())
}

/// Follow the merge through the logger
async fn watch_plain(mut handle: MergeHandle) -> Result<Summary, MergeError> {
    while let Some(event) = handle.next_event().await {
        match event {
            MergeEvent::Progress(progress) => info!("{}", progress.status_text()),
            MergeEvent::Moved(record) => info!(
                "Moved: {} -> {}",
                record.source.display(),
                record.destination.display()
            ),
            MergeEvent::FolderDeleted(folder) => {
                info!("Deleted empty folder: {}", folder.display())
            }
            MergeEvent::Finished(result) => return result,
        }
    }
    Err(MergeError::WorkerStopped)
}

fn run_tui(
    app_config: &AppConfig,
    config: &MergeConfig,
    mut handle: MergeHandle,
    runtime: &Runtime,
) -> Result<Result<Summary, MergeError>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_config.clone(), config);
    let result = ui::run_app(&mut terminal, &mut app, &mut handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        handle.cancel();
        return Err(e);
    }

    Ok(match app.take_outcome() {
        Some(outcome) => outcome,
        None => runtime.block_on(handle.wait()),
    })
}

//--------------------------------------------------------<<

fn report(outcome: Result<Summary, MergeError>) -> Result<()> {
    match outcome {
        Ok(summary) => {
            println!("Folders merged successfully.");
            print_summary(&summary);
            Ok(())
        }
        Err(err) => {
            if let Some(summary) = err.partial_summary() {
                print_summary(summary);
            }
            Err(err).context("Merge failed")
        }
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "Moved {} of {} file(s), {} renamed, {} empty folder(s) deleted",
        summary.files_moved, summary.total_files, summary.files_renamed, summary.folders_deleted
    );
    if let Some(path) = &summary.log_path {
        println!("Log written to {}", path.display());
    }
}
