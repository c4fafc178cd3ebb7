use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::FileShareApi;
use crate::config::Config;
use crate::error::UploadError;
use crate::lister::FileLister;
use crate::models::{SelectedFile, UploadProgress, UploadTask};
use crate::view::{ProgressView, StatusView, Tone};

pub const UPLOAD_SUCCESS: &str = "Upload successful!";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const UPLOAD_ERROR: &str = "Upload error.";

/// How an upload attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded,
    Failed,
    /// Cancelled because a newer upload started while supersede is on
    Superseded,
}

/// Sends selected files to the server and reflects progress in the status and
/// progress views. Uploads are independent: unless supersede is enabled, a second
/// upload never cancels the first.
pub struct UploadController<A> {
    api: Rc<A>,
    lister: Rc<FileLister<A>>,
    status: Rc<dyn StatusView>,
    progress: Rc<dyn ProgressView>,
    refresh_delay: Duration,
    supersede: bool,
    in_flight: RefCell<Option<(Uuid, CancellationToken)>>,
}

impl<A: FileShareApi> UploadController<A> {
    pub fn new(
        api: Rc<A>,
        lister: Rc<FileLister<A>>,
        status: Rc<dyn StatusView>,
        progress: Rc<dyn ProgressView>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            lister,
            status,
            progress,
            refresh_delay: config.refresh_delay,
            supersede: config.supersede_uploads,
            in_flight: RefCell::new(None),
        }
    }

    pub async fn upload_file(&self, file: SelectedFile) -> UploadOutcome {
        let mut task = UploadTask::new(file);
        let span = tracing::info_span!("upload", id = %task.id, file = %task.file.name);
        self.run(&mut task).instrument(span).await
    }

    async fn run(&self, task: &mut UploadTask) -> UploadOutcome {
        let cancel = self.begin(task.id);

        self.status.set_status(&format!("Uploading {}...", task.file.name), Tone::Normal);
        self.progress.show();
        self.progress.set_percent(0.0);
        tracing::info!("Upload started");

        let file = task.file.clone();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let send = self.api.upload(&file, tx);
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(progress = task.progress, "Upload superseded");
                    return UploadOutcome::Superseded;
                }
                Some(report) = rx.recv() => self.apply(task, report),
                result = &mut send => break result,
            }
        };
        // Reports queued in the same poll that completed the request
        while let Ok(report) = rx.try_recv() {
            self.apply(task, report);
        }

        let outcome = match result {
            Ok(()) => {
                task.progress = 100.0;
                self.progress.set_percent(100.0);
                self.status.set_status(UPLOAD_SUCCESS, Tone::Success);
                tracing::info!("Upload finished");

                // A newer upload owns the views once it starts, even during the delay
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::info!("Refresh superseded by a newer upload");
                        return UploadOutcome::Superseded;
                    }
                    _ = tokio::time::sleep(self.refresh_delay) => {}
                }
                self.progress.hide();
                self.status.clear();
                self.lister.refresh().await;
                UploadOutcome::Succeeded
            }
            // Progress keeps its last value
            Err(UploadError::Status(code)) => {
                tracing::warn!(status = code, progress = task.progress, "Upload rejected");
                self.status.set_status(UPLOAD_FAILED, Tone::Error);
                UploadOutcome::Failed
            }
            Err(e) => {
                tracing::error!(progress = task.progress, "Upload error: {}", e);
                self.status.set_status(UPLOAD_ERROR, Tone::Error);
                UploadOutcome::Failed
            }
        };
        self.finish(task.id);
        outcome
    }

    fn apply(&self, task: &mut UploadTask, report: UploadProgress) {
        if let Some(percent) = task.advance(report) {
            self.progress.set_percent(percent);
        }
    }

    fn begin(&self, id: Uuid) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.in_flight.borrow_mut().replace((id, token.clone()));
        if let Some((previous_id, previous_token)) = previous {
            if self.supersede {
                tracing::debug!(superseded = %previous_id, "Cancelling in-flight upload");
                previous_token.cancel();
            }
        }
        token
    }

    fn finish(&self, id: Uuid) {
        let mut in_flight = self.in_flight.borrow_mut();
        if matches!(&*in_flight, Some((current, _)) if *current == id) {
            *in_flight = None;
        }
    }
}
