//! UI handles injected into the lister, the upload controller and the drop zone.
//!
//! Like DOM element handles, views are shared references: every method takes `&self`
//! and implementations keep whatever mutable state they need internally. All calls
//! happen on the single UI task, never concurrently.

pub const NO_FILES_MESSAGE: &str = "No files shared yet";
pub const LIST_ERROR_MESSAGE: &str = "Error loading files";

/// One row of the rendered file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    File { name: String, href: String },
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    NoFiles,
    Error,
}

impl Placeholder {
    pub fn message(self) -> &'static str {
        match self {
            Placeholder::NoFiles => NO_FILES_MESSAGE,
            Placeholder::Error => LIST_ERROR_MESSAGE,
        }
    }
}

/// Colour of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Success,
    Error,
}

pub trait FileListView {
    /// Replaces everything currently shown with `items`
    fn replace(&self, items: Vec<ListItem>);
}

pub trait StatusView {
    fn set_status(&self, text: &str, tone: Tone);
    fn clear(&self);
}

pub trait ProgressView {
    fn show(&self);
    fn hide(&self);
    fn set_percent(&self, percent: f64);
}

pub trait DropTargetView {
    fn set_over(&self, over: bool);
}
