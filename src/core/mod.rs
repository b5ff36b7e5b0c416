// Core infrastructure module
// Provides foundational systems that other modules depend on

pub mod app;
pub mod app_config;
pub mod error;
pub mod events;
pub mod merge_config;

pub use app::{App, RunStatus};
pub use app_config::{AppConfig, MergeDefaults, UiSettings};
pub use error::{FsAction, MergeError};
pub use events::{AppEvent, EventHandler, EventSink, MergeEvent, MergeProgress, MoveRecord, NullSink};
pub use merge_config::{MergeConfig, MergeProfile, ProfileOptions};
