//! Scripted fakes shared by the component tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use crate::api::FileShareApi;
use crate::error::{ListFetchError, UploadError};
use crate::models::{FileDescriptor, SelectedFile, UploadProgress};
use crate::view::{DropTargetView, FileListView, ListItem, ProgressView, StatusView, Tone};

/// Scripted outcome of one upload call
pub struct ScriptedUpload {
    pub progress: Vec<UploadProgress>,
    pub result: Result<(), UploadError>,
    /// When set, the upload stalls after reporting progress until this fires
    pub gate: Option<oneshot::Receiver<()>>,
}

impl ScriptedUpload {
    pub fn ok(progress: Vec<UploadProgress>) -> Self {
        Self { progress, result: Ok(()), gate: None }
    }

    pub fn err(error: UploadError) -> Self {
        Self { progress: Vec::new(), result: Err(error), gate: None }
    }

    pub fn gated(mut self, gate: oneshot::Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[derive(Default)]
pub struct FakeApi {
    lists: RefCell<VecDeque<Result<Vec<FileDescriptor>, ListFetchError>>>,
    uploads: RefCell<VecDeque<ScriptedUpload>>,
    list_calls: Cell<usize>,
    uploaded: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn push_list(&self, result: Result<Vec<FileDescriptor>, ListFetchError>) {
        self.lists.borrow_mut().push_back(result);
    }

    pub fn push_upload(&self, upload: ScriptedUpload) {
        self.uploads.borrow_mut().push_back(upload);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.borrow().clone()
    }
}

impl FileShareApi for FakeApi {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ListFetchError> {
        self.list_calls.set(self.list_calls.get() + 1);
        let next = self.lists.borrow_mut().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn upload(
        &self,
        file: &SelectedFile,
        progress: UnboundedSender<UploadProgress>,
    ) -> Result<(), UploadError> {
        self.uploaded.borrow_mut().push(file.name.clone());
        let script = self.uploads.borrow_mut().pop_front();
        let script = script.unwrap_or_else(|| ScriptedUpload::ok(Vec::new()));

        for report in script.progress {
            let _ = progress.send(report);
        }
        if let Some(gate) = script.gate {
            let _ = gate.await;
        }
        script.result
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    List(Vec<ListItem>),
    Status(String, Tone),
    ClearStatus,
    ShowProgress,
    HideProgress,
    Percent(f64),
    Over(bool),
}

/// Records every call made on any of the view traits, in order
#[derive(Default)]
pub struct RecordingView {
    events: RefCell<Vec<UiEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    pub fn rows(&self) -> Vec<ListItem> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find_map(|e| match e {
                UiEvent::List(items) => Some(items.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn list_renders(&self) -> usize {
        self.events.borrow().iter().filter(|e| matches!(e, UiEvent::List(_))).count()
    }

    pub fn percents(&self) -> Vec<f64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Percent(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<(String, Tone)> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            UiEvent::Status(text, tone) => Some((text.clone(), *tone)),
            UiEvent::ClearStatus => Some((String::new(), Tone::Normal)),
            _ => None,
        })
    }

    pub fn progress_visible(&self) -> bool {
        self.events.borrow().iter().rev().find_map(|e| match e {
            UiEvent::ShowProgress => Some(true),
            UiEvent::HideProgress => Some(false),
            _ => None,
        }) == Some(true)
    }

    pub fn is_over(&self) -> bool {
        self.events.borrow().iter().rev().find_map(|e| match e {
            UiEvent::Over(over) => Some(*over),
            _ => None,
        }) == Some(true)
    }

    fn push(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl FileListView for RecordingView {
    fn replace(&self, items: Vec<ListItem>) {
        self.push(UiEvent::List(items));
    }
}

impl StatusView for RecordingView {
    fn set_status(&self, text: &str, tone: Tone) {
        self.push(UiEvent::Status(text.to_string(), tone));
    }

    fn clear(&self) {
        self.push(UiEvent::ClearStatus);
    }
}

impl ProgressView for RecordingView {
    fn show(&self) {
        self.push(UiEvent::ShowProgress);
    }

    fn hide(&self) {
        self.push(UiEvent::HideProgress);
    }

    fn set_percent(&self, percent: f64) {
        self.push(UiEvent::Percent(percent));
    }
}

impl DropTargetView for RecordingView {
    fn set_over(&self, over: bool) {
        self.push(UiEvent::Over(over));
    }
}
