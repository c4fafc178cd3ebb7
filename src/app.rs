use std::cell::RefCell;
use std::rc::Rc;

use tokio::task::{spawn_local, JoinHandle};

use crate::api::FileShareApi;
use crate::config::Config;
use crate::drop_zone::{first_file, DropEvent, DropZone};
use crate::lister::FileLister;
use crate::models::SelectedFile;
use crate::upload::{UploadController, UploadOutcome};
use crate::view::{DropTargetView, FileListView, ProgressView, StatusView};

/// UI handles the page is built from
pub struct Views {
    pub list: Rc<dyn FileListView>,
    pub status: Rc<dyn StatusView>,
    pub progress: Rc<dyn ProgressView>,
    pub drop_target: Rc<dyn DropTargetView>,
}

/// Wires the lister, the upload controller and the drop zone together.
///
/// Uploads are spawned with [`spawn_local`], so every method that may start one
/// must be called from inside a [`tokio::task::LocalSet`].
pub struct Page<A> {
    lister: Rc<FileLister<A>>,
    uploads: Rc<UploadController<A>>,
    drop_zone: DropZone,
    running: RefCell<Vec<JoinHandle<UploadOutcome>>>,
}

impl<A: FileShareApi + 'static> Page<A> {
    pub fn new(api: Rc<A>, views: Views, config: &Config) -> Self {
        let lister = Rc::new(FileLister::new(api.clone(), views.list));
        let uploads = Rc::new(UploadController::new(
            api,
            lister.clone(),
            views.status,
            views.progress,
            config,
        ));

        Self {
            lister,
            uploads,
            drop_zone: DropZone::new(views.drop_target),
            running: RefCell::new(Vec::new()),
        }
    }

    /// Initial render on page load: the same fetch as [`Page::refresh`]
    pub async fn load(&self) {
        self.refresh().await;
    }

    pub async fn refresh(&self) {
        self.lister.refresh().await;
    }

    /// Returns true when the event started an upload
    pub fn on_drop_event(&self, event: DropEvent) -> bool {
        match self.drop_zone.handle(event) {
            Some(file) => {
                self.start_upload(file);
                true
            }
            None => false,
        }
    }

    /// File picker input; returns true when an upload started
    pub fn on_pick(&self, files: Vec<SelectedFile>) -> bool {
        match first_file(files) {
            Some(file) => {
                self.start_upload(file);
                true
            }
            None => false,
        }
    }

    /// Waits for every upload started so far, including its delayed refresh
    pub async fn wait_idle(&self) -> Vec<UploadOutcome> {
        let running = std::mem::take(&mut *self.running.borrow_mut());
        let mut outcomes = Vec::with_capacity(running.len());
        for handle in running {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("Upload task ended abnormally: {}", e),
            }
        }
        outcomes
    }

    fn start_upload(&self, file: SelectedFile) {
        let uploads = self.uploads.clone();
        let handle = spawn_local(async move { uploads.upload_file(file).await });
        let mut running = self.running.borrow_mut();
        running.retain(|h| !h.is_finished());
        running.push(handle);
    }
}
