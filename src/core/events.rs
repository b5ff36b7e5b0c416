// Event Handling
// Merge events sent from the engine, and terminal input mapped to application events

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

use super::MergeError;
use crate::operations::Summary;

/// Files processed so far out of the pre-counted total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeProgress {
    pub processed: usize,
    pub total: usize,
}

impl MergeProgress {
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    /// Whole-number percentage, 0 when there is nothing to do
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        (self.processed.min(self.total) * 100 / self.total) as u16
    }

    /// Completion ratio in 0.0..=1.0
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.processed.min(self.total) as f64) / (self.total as f64)
    }

    pub fn status_text(&self) -> String {
        format!("Processing: {}/{} files", self.processed, self.total)
    }
}

/// One file moved by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl MoveRecord {
    /// Whether the file was given a `_N` name to avoid a conflict
    pub fn renamed(&self) -> bool {
        self.source.file_name() != self.destination.file_name()
    }
}

/// Messages a merge run sends to whoever is watching it
#[derive(Debug)]
pub enum MergeEvent {
    /// A file finished moving
    Progress(MergeProgress),

    /// Source and destination of the file just moved
    Moved(MoveRecord),

    /// A source folder was empty after the merge and has been removed
    FolderDeleted(PathBuf),

    /// The run is over; always the last event from a worker
    Finished(Result<Summary, MergeError>),
}

/// Receiver side of the engine's event stream
pub trait EventSink {
    fn emit(&mut self, event: MergeEvent);
}

/// Collects events in memory
impl EventSink for Vec<MergeEvent> {
    fn emit(&mut self, event: MergeEvent) {
        self.push(event);
    }
}

impl EventSink for UnboundedSender<MergeEvent> {
    fn emit(&mut self, event: MergeEvent) {
        // A dropped receiver means nobody is watching; the run carries on.
        let _ = self.send(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: MergeEvent) {}
}

/// Application events that can be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Quit the application (cancels a running merge first)
    Quit,

    /// Ask the running merge to stop after the current file
    Cancel,

    /// Scroll the move list up by amount
    ScrollUp(usize),

    /// Scroll the move list down by amount
    ScrollDown(usize),

    /// Jump to the newest moves
    FollowTail,

    /// No operation
    None,
}

/// Event handler that converts terminal events to application events
pub struct EventHandler;

impl EventHandler {
    /// Convert a crossterm event to an application event
    pub fn handle(event: Event) -> AppEvent {
        match event {
            Event::Key(key) => Self::handle_key(key),
            Event::Mouse(mouse) => Self::handle_mouse(mouse),
            _ => AppEvent::None,
        }
    }

    /// Handle keyboard events
    fn handle_key(key: KeyEvent) -> AppEvent {
        // Only handle key press events
        if key.kind != crossterm::event::KeyEventKind::Press {
            return AppEvent::None;
        }

        match key.code {
            KeyCode::Char('q') => AppEvent::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => AppEvent::Quit,

            KeyCode::Char('c') | KeyCode::Esc => AppEvent::Cancel,

            KeyCode::Up | KeyCode::Char('k') => AppEvent::ScrollUp(1),
            KeyCode::Down | KeyCode::Char('j') => AppEvent::ScrollDown(1),
            KeyCode::PageUp => AppEvent::ScrollUp(10),
            KeyCode::PageDown => AppEvent::ScrollDown(10),
            KeyCode::End | KeyCode::Char('G') => AppEvent::FollowTail,

            _ => AppEvent::None,
        }
    }

    /// Handle mouse events
    fn handle_mouse(mouse: MouseEvent) -> AppEvent {
        match mouse.kind {
            MouseEventKind::ScrollUp => AppEvent::ScrollUp(1),
            MouseEventKind::ScrollDown => AppEvent::ScrollDown(1),
            _ => AppEvent::None,
        }
    }
}
