use std::path::{Path, PathBuf};

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ListFetchError;

/// Characters `encodeURIComponent` leaves untouched
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A file the server offers for download
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
}

impl FileDescriptor {
    pub fn validate(&self) -> Result<(), ListFetchError> {
        if self.name.is_empty() {
            return Err(ListFetchError::Invalid("file name is empty".to_string()));
        }
        if self.name.chars().any(char::is_control) {
            return Err(ListFetchError::Invalid(format!(
                "file name {:?} contains control characters",
                self.name
            )));
        }
        Ok(())
    }

    pub fn download_href(&self) -> String {
        download_href(&self.name)
    }
}

/// Relative download link for a shared file
pub fn download_href(name: &str) -> String {
    format!("/download/{}", utf8_percent_encode(name, URI_COMPONENT))
}

/// Where the bytes of a selected file come from
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Bytes),
}

/// A file picked or dropped by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Self { name, source: FileSource::Path(path) }
    }

    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self { name: name.into(), source: FileSource::Memory(data.into()) }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(p) => Some(p),
            FileSource::Memory(_) => None,
        }
    }
}

/// One in-flight upload attempt
#[derive(Debug)]
pub struct UploadTask {
    pub id: Uuid,
    pub file: SelectedFile,
    /// Percentage in 0..=100
    pub progress: f64,
}

impl UploadTask {
    pub fn new(file: SelectedFile) -> Self {
        Self { id: Uuid::new_v4(), file, progress: 0.0 }
    }

    /// Applies a progress report, ignoring reports whose total is unknown
    pub fn advance(&mut self, report: UploadProgress) -> Option<f64> {
        let percent = report.percent()?;
        self.progress = percent;
        Some(percent)
    }
}

/// Bytes handed to the network so far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl UploadProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.loaded as f64 / total as f64 * 100.0).min(100.0)),
            _ => None,
        }
    }
}
