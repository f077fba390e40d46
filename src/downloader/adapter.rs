// Extraction adapter - runs an Extractor for one request
//
// Turns the extractor's result into either a usable payload or a single
// DownloadError. Nothing here is retried.

use serde_json::Value;
use std::path::PathBuf;

use super::errors::DownloadError;
use super::models::{DownloadedArtifact, Extraction, ExtractionOptions, ExtractionRequest};
use super::traits::Extractor;
use super::workspace::Workspace;

/// Info-document keys that may name the output file, in order of preference
const FILENAME_KEYS: &[&str] = &["filepath", "_filename", "filename"];

/// Look up metadata without downloading.
pub async fn inspect(
    extractor: &dyn Extractor,
    request: &ExtractionRequest,
    options: &ExtractionOptions,
) -> Result<Value, DownloadError> {
    let extraction = run(extractor, request, options).await?;
    Ok(extraction.info)
}

/// Download into `workspace` and locate the resulting file.
///
/// On any failure the workspace is dropped here, which removes whatever the
/// extractor managed to write.
pub async fn fetch(
    extractor: &dyn Extractor,
    request: &ExtractionRequest,
    options: &ExtractionOptions,
    workspace: Workspace,
) -> Result<DownloadedArtifact, DownloadError> {
    let extraction = run(extractor, request, options).await?;
    let candidates = output_candidates(&extraction, &workspace);

    let mut path = None;
    for candidate in &candidates {
        if workspace.contains_file(candidate).await {
            path = Some(candidate.clone());
            break;
        }
    }

    let Some(path) = path else {
        tracing::warn!(
            url = %request.source_url,
            candidates = ?candidates,
            "Extractor reported success but no output file was found"
        );
        return Err(DownloadError::ArtifactMissing(candidates.into_iter().next()));
    };

    let suggested_filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DownloadError::ArtifactMissing(Some(path.clone())))?;

    tracing::info!(
        url = %request.source_url,
        file = %path.display(),
        "Download complete"
    );

    Ok(DownloadedArtifact {
        workspace,
        path,
        suggested_filename,
    })
}

async fn run(
    extractor: &dyn Extractor,
    request: &ExtractionRequest,
    options: &ExtractionOptions,
) -> Result<Extraction, DownloadError> {
    match extractor.extract(&request.source_url, options).await {
        Ok(extraction) => {
            tracing::debug!(
                extractor = extractor.name(),
                url = %request.source_url,
                mode = ?options.mode(),
                "Extraction succeeded"
            );
            Ok(extraction)
        }
        Err(e) => {
            tracing::warn!(
                extractor = extractor.name(),
                url = %request.source_url,
                kind = %e.kind(),
                error = %e,
                "Extraction failed"
            );
            Err(e)
        }
    }
}

/// Paths that may hold the downloaded file. The path printed after
/// post-processing comes first since merging or remuxing can change the
/// extension of the name yt-dlp planned initially.
fn output_candidates(extraction: &Extraction, workspace: &Workspace) -> Vec<PathBuf> {
    let reported = extraction.file.iter().cloned();
    let from_info = FILENAME_KEYS
        .iter()
        .filter_map(|key| extraction.info.get(*key).and_then(Value::as_str))
        .map(PathBuf::from);

    let mut out: Vec<PathBuf> = Vec::new();
    for p in reported.chain(from_info) {
        let p = workspace.resolve(&p);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
