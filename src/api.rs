use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode, Url};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, ListFetchError, UploadError};
use crate::models::{FileDescriptor, FileSource, SelectedFile, UploadProgress};

type ChunkStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// The two calls the front-end makes against the file server
pub trait FileShareApi {
    /// `GET /api/files`
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ListFetchError>;

    /// `POST /upload`, reporting each chunk handed to the network on `progress`
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: UnboundedSender<UploadProgress>,
    ) -> Result<(), UploadError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    chunk_size: usize,
}

impl HttpApi {
    pub fn new(server: &str, chunk_size: usize) -> Result<Self, AppError> {
        let mut base =
            Url::parse(server).map_err(|_| AppError::InvalidServerUrl(server.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(AppError::InvalidServerUrl(server.to_string()));
        }
        // Url::join would otherwise replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client: Client::new(), base, chunk_size: chunk_size.max(1) })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Url {
        // Both endpoint paths are static and valid relative references
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }

    async fn body_stream(
        &self,
        file: &SelectedFile,
    ) -> Result<(ChunkStream, u64), UploadError> {
        match &file.source {
            FileSource::Path(path) => {
                let handle = tokio::fs::File::open(path).await?;
                let len = handle.metadata().await?.len();
                let chunks: ChunkStream = Box::pin(ReaderStream::with_capacity(handle, self.chunk_size));
                Ok((chunks, len))
            }
            FileSource::Memory(data) => {
                let slices: Vec<io::Result<Bytes>> = (0..data.len())
                    .step_by(self.chunk_size)
                    .map(|start| Ok(data.slice(start..(start + self.chunk_size).min(data.len()))))
                    .collect();
                let chunks: ChunkStream = Box::pin(stream::iter(slices));
                Ok((chunks, data.len() as u64))
            }
        }
    }
}

impl FileShareApi for HttpApi {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ListFetchError> {
        let url = self.endpoint("api/files");
        tracing::debug!(%url, "fetching file list");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ListFetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let files: Vec<FileDescriptor> = serde_json::from_slice(&body)?;
        for file in &files {
            file.validate()?;
        }
        Ok(files)
    }

    async fn upload(
        &self,
        file: &SelectedFile,
        progress: UnboundedSender<UploadProgress>,
    ) -> Result<(), UploadError> {
        let (chunks, total) = self.body_stream(file).await?;
        let _ = progress.send(UploadProgress { loaded: 0, total: Some(total) });

        let mut loaded = 0u64;
        let counted = chunks.map(move |chunk| {
            if let Ok(bytes) = &chunk {
                loaded += bytes.len() as u64;
                let _ = progress.send(UploadProgress { loaded, total: Some(total) });
            }
            chunk
        });

        let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
        let part = Part::stream_with_length(Body::wrap_stream(counted), total)
            .file_name(file.name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new().part("file", part);

        let url = self.endpoint("upload");
        tracing::debug!(%url, total, "sending upload");

        let response = self.client.post(url).multipart(form).send().await?;
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(UploadError::Status(response.status().as_u16()))
        }
    }
}
