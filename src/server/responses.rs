//! Success responses: metadata JSON, format lists and file attachments.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::Stream;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio_util::io::ReaderStream;

use super::error::ApiError;
use crate::downloader::{DownloadedArtifact, FormatDescriptor, MediaMetadata, Workspace};

const CHUNK_SIZE: usize = 64 * 1024;

lazy_static::lazy_static! {
    static ref UNSAFE_HEADER_CHARS_RE: Regex = Regex::new(r#"[^\x20-\x7E]|["\\]"#).unwrap();
}

#[derive(Debug, Serialize)]
pub struct FormatList {
    pub formats: Vec<FormatDescriptor>,
}

pub fn metadata(info: &Value) -> MediaMetadata {
    MediaMetadata::from_info(info)
}

pub fn format_list(info: &Value) -> FormatList {
    FormatList {
        formats: FormatDescriptor::list_from_info(info),
    }
}

/// Stream a downloaded file back as an attachment.
///
/// The artifact's workspace moves into the body, so the directory lives until
/// the last chunk is sent or the client goes away.
pub async fn attachment(artifact: DownloadedArtifact) -> Result<Response, ApiError> {
    let DownloadedArtifact {
        workspace,
        path,
        suggested_filename,
    } = artifact;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::DownloadFailed)?;
    let size = file
        .metadata()
        .await
        .map_err(|_| ApiError::DownloadFailed)?
        .len();

    let stream = ArtifactStream {
        inner: ReaderStream::with_capacity(file, CHUNK_SIZE),
        _workspace: workspace,
    };

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE.as_str(),
                guess_content_type(&suggested_filename).to_string(),
            ),
            (header::CONTENT_LENGTH.as_str(), size.to_string()),
            (
                header::CONTENT_DISPOSITION.as_str(),
                content_disposition(&suggested_filename),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let fallback = UNSAFE_HEADER_CHARS_RE.replace_all(filename, "_");
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// Guess the MIME type from the file extension.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "flv" => "video/x-flv",
        "ts" => "video/mp2t",
        "3gp" => "video/3gpp",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "opus" | "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// File body that keeps its workspace alive until dropped.
struct ArtifactStream {
    inner: ReaderStream<tokio::fs::File>,
    _workspace: Workspace,
}

impl Stream for ArtifactStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
