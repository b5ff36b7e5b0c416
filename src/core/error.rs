// Merge Errors
// Typed failures reported by the merge engine and its worker

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::operations::Summary;

/// Filesystem step that was being performed when a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAction {
    CreateTarget,
    Walk,
    CreateDirectory,
    Move,
    RemoveFolder,
    OpenLog,
    WriteLog,
}

impl fmt::Display for FsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FsAction::CreateTarget => "creating target folder",
            FsAction::Walk => "reading source tree",
            FsAction::CreateDirectory => "creating directory",
            FsAction::Move => "moving file",
            FsAction::RemoveFolder => "removing empty folder",
            FsAction::OpenLog => "opening log file",
            FsAction::WriteLog => "writing log file",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("no source folders specified")]
    NoSourcesSpecified,

    #[error("no target folder specified")]
    NoTargetSpecified,

    #[error("source folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("error {action} {}: {source}", path.display())]
    Filesystem {
        action: FsAction,
        path: PathBuf,
        /// Work completed before the failure
        summary: Summary,
        #[source]
        source: io::Error,
    },

    #[error("merge cancelled after {} of {} files", summary.files_moved, summary.total_files)]
    Cancelled { summary: Summary },

    #[error("merge worker stopped before reporting a result")]
    WorkerStopped,
}

impl MergeError {
    /// Summary of the work done before the run stopped, if it got that far
    pub fn partial_summary(&self) -> Option<&Summary> {
        match self {
            MergeError::Filesystem { summary, .. } | MergeError::Cancelled { summary } => {
                Some(summary)
            }
            _ => None,
        }
    }

    /// Underlying I/O error kind for filesystem failures
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            MergeError::Filesystem { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// A filesystem failure that has not yet been paired with a run summary
#[derive(Debug)]
pub(crate) struct FsFailure {
    pub action: FsAction,
    pub path: PathBuf,
    pub source: io::Error,
}

impl FsFailure {
    pub fn new(action: FsAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn into_error(self, summary: Summary) -> MergeError {
        MergeError::Filesystem {
            action: self.action,
            path: self.path,
            summary,
            source: self.source,
        }
    }
}
