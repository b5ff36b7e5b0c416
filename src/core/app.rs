// Application State
// Progress view state, fed by merge events and terminal input

use std::collections::VecDeque;
use std::path::PathBuf;

use super::{AppConfig, MergeConfig, MergeError, MergeEvent, MergeProgress, MoveRecord};
use crate::operations::Summary;

/// Where the merge run currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Cancellation requested, waiting for the current file to finish
    Cancelling,
    Completed,
    Cancelled,
    Failed(String),
}

impl RunStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Cancelled | RunStatus::Failed(_))
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Application configuration (built-in defaults)
    pub config: AppConfig,

    /// Target folder shown in the header
    pub target: PathBuf,

    /// Number of source folders being merged
    pub source_count: usize,

    pub progress: MergeProgress,

    /// Most recent moves, oldest first
    pub recent_moves: VecDeque<MoveRecord>,

    /// Source folders removed during the run
    pub deleted_folders: Vec<PathBuf>,

    pub status: RunStatus,

    /// Lines scrolled up from the newest move; 0 follows the tail
    pub scroll_offset: usize,

    /// Final result, taken by the caller once the view closes
    outcome: Option<Result<Summary, MergeError>>,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new application instance for one run
    pub fn new(config: AppConfig, merge: &MergeConfig) -> Self {
        Self {
            config,
            target: merge.target().to_path_buf(),
            source_count: merge.sources().len(),
            progress: MergeProgress::default(),
            recent_moves: VecDeque::new(),
            deleted_folders: Vec::new(),
            status: RunStatus::Running,
            scroll_offset: 0,
            outcome: None,
            should_quit: false,
        }
    }

    /// Fold a merge event into the view state
    pub fn apply(&mut self, event: MergeEvent) {
        match event {
            MergeEvent::Progress(progress) => self.progress = progress,
            MergeEvent::Moved(record) => {
                while !self.recent_moves.is_empty()
                    && self.recent_moves.len() >= self.config.ui.recent_moves
                {
                    self.recent_moves.pop_front();
                }
                self.recent_moves.push_back(record);
                // Keep a scrolled-back view anchored on the same lines
                if self.scroll_offset > 0 {
                    self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
                }
            }
            MergeEvent::FolderDeleted(folder) => self.deleted_folders.push(folder),
            MergeEvent::Finished(result) => {
                self.status = match &result {
                    Ok(_) => RunStatus::Completed,
                    Err(MergeError::Cancelled { .. }) => RunStatus::Cancelled,
                    Err(e) => RunStatus::Failed(e.to_string()),
                };
                self.outcome = Some(result);
            }
        }
    }

    /// Mark that cancellation was requested. Returns false if the run is already over.
    pub fn request_cancel(&mut self) -> bool {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Cancelling;
            true
        } else {
            false
        }
    }

    /// Status line for the footer
    pub fn status_text(&self) -> String {
        match &self.status {
            RunStatus::Running => self.progress.status_text(),
            RunStatus::Cancelling => "Cancelling after the current file...".to_string(),
            RunStatus::Completed => "Merge completed".to_string(),
            RunStatus::Cancelled => format!(
                "Merge cancelled after {}/{} files",
                self.progress.processed, self.progress.total
            ),
            RunStatus::Failed(message) => format!("Merge failed: {}", message),
        }
    }

    fn max_scroll(&self) -> usize {
        self.recent_moves.len().saturating_sub(1)
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_scroll());
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn follow_tail(&mut self) {
        self.scroll_offset = 0;
    }

    /// Take the run's result once it has arrived
    pub fn take_outcome(&mut self) -> Option<Result<Summary, MergeError>> {
        self.outcome.take()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
