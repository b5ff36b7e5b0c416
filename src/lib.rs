// Folder Merger Library
// Moves the contents of many source folders into one target folder

// Core infrastructure - config, events, errors and view state
pub mod core;

// Operations - the merge engine and its background worker
pub mod operations;

// UI - terminal progress view
pub mod ui;

// Utilities - helper functions and tools
pub mod utilities;

// Application constants
pub mod constants;

// Re-export commonly used items for convenience
pub use crate::core::{
    AppConfig, EventSink, MergeConfig, MergeError, MergeEvent, MergeProfile, MergeProgress,
    MoveRecord,
};
pub use crate::operations::{spawn_merge, MergeEngine, MergeHandle, Summary};
pub use crate::constants::*;
