//! Upload sources and multipart form assembly

use crate::{cid::ContentHasher, ClientError, Result};
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Read buffer size while hashing
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Caller-supplied upload metadata
pub type Metadata = Map<String, Value>;

/// A local file read into memory, with its content id
#[derive(Clone, Debug)]
pub struct UploadSource {
    /// Path the file was read from
    pub path: PathBuf,
    /// Base name of the file
    pub name: String,
    /// Size reported by the filesystem
    pub size: u64,
    /// Content id of the bytes
    pub cid: String,
    /// File contents
    pub data: Bytes,
}

impl UploadSource {
    /// Open, stat and hash the file at `path`.
    ///
    /// The file handle lives only inside this call and is closed on every
    /// return path.
    pub async fn read(path: &Path) -> Result<Self> {
        let file_error = |source| ClientError::FileAccess {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).await.map_err(file_error)?;
        let meta = file.metadata().await.map_err(file_error)?;
        if !meta.is_file() {
            return Err(file_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let mut hasher = ContentHasher::new();
        let mut data = Vec::with_capacity(meta.len() as usize);
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = file.read(&mut buf).await.map_err(|source| ClientError::Hashing {
                path: path.to_path_buf(),
                source,
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            data.extend_from_slice(&buf[..n]);
        }

        Ok(Self {
            path: path.to_path_buf(),
            name: base_name(path),
            size: meta.len(),
            cid: hasher.finalize(),
            data: Bytes::from(data),
        })
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.path)
            .first_or_octet_stream()
            .to_string()
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Caller metadata (or an empty map) plus the uploader's DID and the call time
pub fn upload_metadata(metadata: Option<Metadata>, did: &str, now: DateTime<Utc>) -> Metadata {
    let mut metadata = metadata.unwrap_or_default();
    metadata.insert("did".to_string(), Value::String(did.to_string()));
    metadata.insert(
        "timestamp".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    metadata
}

/// Multipart form with a `file` part and a JSON `metadata` field
pub fn upload_form(source: &UploadSource, metadata: &Metadata) -> Result<Form> {
    let metadata_json = serde_json::to_string(metadata)?;

    let file_part = Part::stream_with_length(source.data.clone(), source.data.len() as u64)
        .file_name(source.name.clone())
        .mime_str(&source.mime_type())
        .map_err(ClientError::RequestConstruction)?;

    Ok(Form::new()
        .part("file", file_part)
        .text("metadata", metadata_json))
}
