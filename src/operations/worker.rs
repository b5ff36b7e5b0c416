// Merge Worker
// Runs the engine on a background thread and streams its events back

use log::warn;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{MergeEngine, Summary};
use crate::core::{MergeError, MergeEvent};

/// Handle to a merge running in the background
#[derive(Debug)]
pub struct MergeHandle {
    events: UnboundedReceiver<MergeEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Start a merge on tokio's blocking pool.
///
/// The config is checked before anything is spawned, so validation errors come
/// back here rather than through the event stream. Must be called from within
/// a tokio runtime.
pub fn spawn_merge(engine: MergeEngine) -> Result<MergeHandle, MergeError> {
    engine.config().validate()?;

    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = engine.cancellation_token();

    let task = tokio::task::spawn_blocking(move || {
        let mut sink = tx.clone();
        let result = engine.run(&mut sink);
        if tx.send(MergeEvent::Finished(result)).is_err() {
            warn!("Merge finished but nobody is listening for the result");
        }
    });

    Ok(MergeHandle {
        events: rx,
        cancel,
        task,
    })
}

impl MergeHandle {
    /// Wait for the next event; `None` once the worker is gone
    pub async fn next_event(&mut self) -> Option<MergeEvent> {
        self.events.recv().await
    }

    /// Take an event if one is ready
    pub fn try_next_event(&mut self) -> Option<MergeEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the run before its next file
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drain remaining events and return the outcome of the run
    pub async fn wait(mut self) -> Result<Summary, MergeError> {
        while let Some(event) = self.events.recv().await {
            if let MergeEvent::Finished(result) = event {
                return result;
            }
        }
        Err(MergeError::WorkerStopped)
    }
}
