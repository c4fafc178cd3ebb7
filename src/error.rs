use std::fmt;

/// Failure to retrieve or understand the shared file list
#[derive(Debug)]
pub enum ListFetchError {
    Transport(String),
    Status(u16),
    Decode(String),
    Invalid(String),
}

/// Failure of a single upload attempt
#[derive(Debug)]
pub enum UploadError {
    Transport(String),
    Status(u16),
    Io(std::io::Error),
}

/// Errors that end a CLI invocation
#[derive(Debug)]
pub enum AppError {
    InvalidServerUrl(String),
    FileNotFound(String),
    UploadFailed(String),
    IoError(std::io::Error),
}

impl fmt::Display for ListFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListFetchError::Transport(msg) => write!(f, "request failed: {}", msg),
            ListFetchError::Status(code) => write!(f, "server answered with status {}", code),
            ListFetchError::Decode(msg) => write!(f, "malformed file list: {}", msg),
            ListFetchError::Invalid(msg) => write!(f, "invalid file entry: {}", msg),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Transport(msg) => write!(f, "upload request failed: {}", msg),
            UploadError::Status(code) => write!(f, "server rejected upload with status {}", code),
            UploadError::Io(e) => write!(f, "cannot read file: {}", e),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidServerUrl(url) => write!(f, "Invalid server URL '{}'", url),
            AppError::FileNotFound(path) => write!(f, "Cannot read file '{}'", path),
            AppError::UploadFailed(name) => write!(f, "Upload of '{}' did not succeed", name),
            AppError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ListFetchError {}
impl std::error::Error for UploadError {}
impl std::error::Error for AppError {}

impl From<reqwest::Error> for ListFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ListFetchError::Decode(e.to_string())
        } else {
            ListFetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ListFetchError {
    fn from(e: serde_json::Error) -> Self {
        ListFetchError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        UploadError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for UploadError {
    fn from(e: std::io::Error) -> Self {
        UploadError::Io(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IoError(e)
    }
}
