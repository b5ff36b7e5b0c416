// Merge Engine
// Moves the files of many source folders into one target folder

use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use super::move_log::MoveLog;
use super::walk;
use crate::core::error::{FsAction, FsFailure};
use crate::core::{EventSink, MergeConfig, MergeError, MergeEvent, MergeProgress, MoveRecord};
use crate::utilities::{is_empty_dir, is_occupied, move_file, numbered_path, relative_to_root};

/// Result of a merge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files counted before the first move
    pub total_files: usize,
    /// Files moved into the target
    pub files_moved: usize,
    /// Moved files that were given a `_N` name
    pub files_renamed: usize,
    /// Source folders removed because the merge left them empty
    pub folders_deleted: usize,
    /// Move log written during the run
    pub log_path: Option<PathBuf>,
}

/// Why a run stopped early
enum Interrupt {
    Failed(FsFailure),
    Cancelled,
}

impl From<FsFailure> for Interrupt {
    fn from(failure: FsFailure) -> Self {
        Interrupt::Failed(failure)
    }
}

/// Engine for merge runs
#[derive(Debug, Clone)]
pub struct MergeEngine {
    config: MergeConfig,
    cancel: CancellationToken,
}

impl MergeEngine {
    /// Create a new merge engine for the given config
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Token that stops the run before its next file when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the merge, reporting progress to `sink`.
    ///
    /// Files already moved stay where they are if the run fails part way.
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<Summary, MergeError> {
        self.config.validate()?;

        let target = self.config.target();
        fs::create_dir_all(target)
            .map_err(|e| FsFailure::new(FsAction::CreateTarget, target, e).into_error(Summary::default()))?;

        let total = walk::count_files(self.config.sources())
            .map_err(|f| f.into_error(Summary::default()))?;

        info!(
            "Merging {} files from {} folders into {}",
            total,
            self.config.sources().len(),
            target.display()
        );

        let mut summary = Summary {
            total_files: total,
            ..Summary::default()
        };

        let result = self.execute(&mut summary, sink);
        match result {
            Ok(()) => {
                info!("Folders merged successfully.");
                Ok(summary)
            }
            Err(Interrupt::Failed(failure)) => {
                let err = failure.into_error(summary);
                debug!("Error during merge: {err}");
                Err(err)
            }
            Err(Interrupt::Cancelled) => {
                info!("Merge cancelled after {} of {} files", summary.files_moved, total);
                Err(MergeError::Cancelled { summary })
            }
        }
    }

    // The log lives in this frame so every return path closes it
    fn execute(&self, summary: &mut Summary, sink: &mut dyn EventSink) -> Result<(), Interrupt> {
        let mut log = if self.config.write_log() {
            let dir = self.config.log_dir();
            let log = MoveLog::create(dir).map_err(|e| FsFailure::new(FsAction::OpenLog, dir, e))?;
            info!("Writing move log to {}", log.path().display());
            summary.log_path = Some(log.path().to_path_buf());
            Some(log)
        } else {
            None
        };

        for source in self.config.sources() {
            self.merge_folder(source, summary, log.as_mut(), sink)?;
        }

        Ok(())
    }

    fn merge_folder(
        &self,
        root: &Path,
        summary: &mut Summary,
        mut log: Option<&mut MoveLog>,
        sink: &mut dyn EventSink,
    ) -> Result<(), Interrupt> {
        // Enumerate fully first so moves never disturb the walk
        let files = walk::collect_files(root)?;
        debug!("{} files in {}", files.len(), root.display());

        for file in files {
            if self.cancel.is_cancelled() {
                return Err(Interrupt::Cancelled);
            }

            let record = self.move_one(root, file)?;
            summary.files_moved += 1;
            if record.renamed() {
                summary.files_renamed += 1;
            }

            sink.emit(MergeEvent::Progress(MergeProgress::new(
                summary.files_moved,
                summary.total_files,
            )));

            if let Some(log) = log.as_deref_mut() {
                log.record_move(&record)
                    .map_err(|e| FsFailure::new(FsAction::WriteLog, log.path(), e))?;
            }
            debug!("Moved: {} -> {}", record.source.display(), record.destination.display());
            sink.emit(MergeEvent::Moved(record));
        }

        if self.config.delete_empty_sources() {
            let empty =
                is_empty_dir(root).map_err(|e| FsFailure::new(FsAction::RemoveFolder, root, e))?;
            if empty {
                fs::remove_dir(root).map_err(|e| FsFailure::new(FsAction::RemoveFolder, root, e))?;
                summary.folders_deleted += 1;
                debug!("Deleted empty folder: {}", root.display());

                if let Some(log) = log.as_deref_mut() {
                    log.record_deleted_folder(root)
                        .map_err(|e| FsFailure::new(FsAction::WriteLog, log.path(), e))?;
                }
                sink.emit(MergeEvent::FolderDeleted(root.to_path_buf()));
            }
        }

        Ok(())
    }

    fn move_one(&self, root: &Path, file: PathBuf) -> Result<MoveRecord, FsFailure> {
        let destination = self.destination_for(root, &file);

        if self.config.preserve_structure() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| FsFailure::new(FsAction::CreateDirectory, parent, e))?;
            }
        }

        let destination = self.resolve_conflict(destination, is_occupied)?;
        move_file(&file, &destination).map_err(|e| FsFailure::new(FsAction::Move, &file, e))?;

        Ok(MoveRecord {
            source: file,
            destination,
        })
    }

    /// Where a file lands before any conflict renaming
    fn destination_for(&self, root: &Path, file: &Path) -> PathBuf {
        let target = self.config.target();
        if self.config.preserve_structure() {
            target.join(relative_to_root(root, file))
        } else {
            target.join(file.file_name().unwrap_or(file.as_os_str()))
        }
    }

    /// Pick a free name for `destination`, or fail if renaming is off
    fn resolve_conflict(
        &self,
        destination: PathBuf,
        occupied: impl Fn(&Path) -> bool,
    ) -> Result<PathBuf, FsFailure> {
        if !occupied(&destination) {
            return Ok(destination);
        }

        if !self.config.rename_on_conflict() {
            return Err(FsFailure::new(
                FsAction::Move,
                destination,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }

        let mut counter = 1;
        loop {
            let candidate = numbered_path(&destination, counter);
            if !occupied(&candidate) {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Work out every move a run would make without touching the filesystem.
    ///
    /// Earlier planned destinations count as taken when resolving later conflicts,
    /// and a file under nested sources is planned only for the first of them.
    pub fn plan(&self) -> Result<Vec<MoveRecord>, MergeError> {
        self.config.validate()?;

        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut planned: HashSet<PathBuf> = HashSet::new();
        let mut moves = Vec::new();

        for root in self.config.sources() {
            let files = walk::collect_files(root).map_err(|f| f.into_error(Summary::default()))?;

            for file in files {
                if !planned.insert(file.clone()) {
                    continue;
                }
                let destination = self.destination_for(root, &file);
                let destination = self
                    .resolve_conflict(destination, |p| claimed.contains(p) || is_occupied(p))
                    .map_err(|f| {
                        f.into_error(Summary {
                            files_moved: moves.len(),
                            ..Summary::default()
                        })
                    })?;

                claimed.insert(destination.clone());
                moves.push(MoveRecord {
                    source: file,
                    destination,
                });
            }
        }

        Ok(moves)
    }
}
