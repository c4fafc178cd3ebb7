use std::cell::Cell;
use std::rc::Rc;

use percent_encoding::percent_decode_str;

use crate::models::SelectedFile;
use crate::view::DropTargetView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone)]
pub enum DropEvent {
    DragOver,
    DragLeave,
    DragEnd,
    Drop(Vec<SelectedFile>),
}

/// The region accepting dropped files
pub struct DropZone {
    view: Rc<dyn DropTargetView>,
    state: Cell<DragState>,
}

impl DropZone {
    pub fn new(view: Rc<dyn DropTargetView>) -> Self {
        Self { view, state: Cell::new(DragState::Idle) }
    }

    pub fn state(&self) -> DragState {
        self.state.get()
    }

    /// Feeds one drag event. Returns the file to upload when the event is a drop
    /// carrying at least one file.
    pub fn handle(&self, event: DropEvent) -> Option<SelectedFile> {
        match event {
            DropEvent::DragOver => {
                self.set(DragState::Dragging);
                None
            }
            DropEvent::DragLeave | DropEvent::DragEnd => {
                self.set(DragState::Idle);
                None
            }
            DropEvent::Drop(files) => {
                self.set(DragState::Idle);
                first_file(files)
            }
        }
    }

    fn set(&self, state: DragState) {
        if self.state() != state {
            tracing::debug!(?state, "drag state changed");
        }
        self.state.set(state);
        self.view.set_over(state == DragState::Dragging);
    }
}

/// Picker input: only the first selected file is uploaded
pub fn first_file(files: Vec<SelectedFile>) -> Option<SelectedFile> {
    if files.len() > 1 {
        tracing::warn!(
            ignored = files.len() - 1,
            "Multiple files selected, only the first one is uploaded"
        );
    }
    files.into_iter().next()
}

/// Turns a line pasted into the terminal (what a terminal produces when a file is
/// dragged onto it) into the drag events a graphical drop target would see.
pub fn pasted_gesture(line: &str) -> Vec<DropEvent> {
    let files: Vec<SelectedFile> = split_paths(line)
        .into_iter()
        .map(|token| SelectedFile::from_path(file_uri_to_path(&token)))
        .collect();

    if files.is_empty() {
        vec![DropEvent::DragOver, DropEvent::DragLeave]
    } else {
        vec![DropEvent::DragOver, DropEvent::Drop(files)]
    }
}

/// Splits on unquoted whitespace, honoring single quotes, double quotes and
/// backslash escapes the way terminals quote dropped paths
fn split_paths(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut single = false;
    let mut double = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !double => {
                single = !single;
                in_token = true;
            }
            '"' if !single => {
                double = !double;
                in_token = true;
            }
            '\\' if !single => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_token = true;
                }
            }
            c if c.is_whitespace() && !single && !double => {
                if in_token && !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                in_token = false;
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token && !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn file_uri_to_path(token: &str) -> String {
    let Some(rest) = token.strip_prefix("file://") else {
        return token.to_string();
    };
    // Skip the authority, usually empty or "localhost"
    let path = match rest.find('/') {
        Some(pos) => &rest[pos..],
        None => rest,
    };
    percent_decode_str(path).decode_utf8_lossy().to_string()
}
