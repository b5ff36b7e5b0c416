// Operations module
// Business logic for merge runs: tree walking, moving, logging and the background worker

pub mod merge;
pub mod move_log;
pub mod walk;
pub mod worker;

pub use merge::{MergeEngine, Summary};
pub use move_log::MoveLog;
pub use worker::{spawn_merge, MergeHandle};
