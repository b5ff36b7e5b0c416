// Application Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

use std::path::PathBuf;
use std::time::Duration;

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Application-level configuration for folder-merger
/// Values are compiled in from config.yaml at build time
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Progress view settings
    pub ui: UiSettings,

    /// Default merge options
    pub defaults: MergeDefaults,
}

#[derive(Debug, Clone)]
pub struct UiSettings {
    /// Redraw interval of the progress view
    pub tick_rate: Duration,

    /// Number of moves kept in the scrollback list
    pub recent_moves: usize,
}

/// Option values used when neither a profile nor a flag sets them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeDefaults {
    pub rename_on_conflict: bool,
    pub delete_empty_sources: bool,
    pub preserve_structure: bool,
    pub write_log: bool,

    /// Directory the move log is written to
    pub log_dir: PathBuf,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(compiled::TICK_RATE_MS),
            recent_moves: compiled::RECENT_MOVES,
        }
    }
}

impl Default for MergeDefaults {
    fn default() -> Self {
        Self {
            rename_on_conflict: compiled::RENAME_ON_CONFLICT,
            delete_empty_sources: compiled::DELETE_EMPTY_SOURCES,
            preserve_structure: compiled::PRESERVE_STRUCTURE,
            write_log: compiled::WRITE_LOG,
            log_dir: PathBuf::from(compiled::LOG_DIR),
        }
    }
}
