// yt-dlp Extractor - runs the native `yt-dlp` binary
//
// Inspect mode dumps the info JSON without touching disk. Fetch mode downloads
// with `--no-simulate`, printing the info JSON before the download and the
// final file path after post-processing.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{Extraction, ExtractionMode, ExtractionOptions};
use crate::downloader::traits::Extractor;
use crate::downloader::utils::{failure_message, redact_credentials, run_output};

/// Extractor backed by the yt-dlp command-line program
pub struct YtDlpCli {
    ytdlp_path: PathBuf,
}

impl YtDlpCli {
    pub fn new(ytdlp_path: PathBuf) -> Self {
        Self { ytdlp_path }
    }

    /// Build command arguments
    pub fn build_args(url: &str, options: &ExtractionOptions) -> Vec<String> {
        let mut args = vec!["--no-playlist".to_string()];

        if options.quiet {
            args.push("--quiet".to_string());
            args.push("--no-warnings".to_string());
            args.push("--no-progress".to_string());
        }

        match options.mode() {
            ExtractionMode::Inspect => {
                args.push("--dump-single-json".to_string());
            }
            ExtractionMode::Fetch => {
                args.push("--no-simulate".to_string());
                args.push("--dump-json".to_string());
                args.push("--print".to_string());
                args.push("after_move:filepath".to_string());
            }
        }

        if let Some(format) = &options.format_selector {
            args.push("-f".to_string());
            args.push(format.clone());
        }

        if let Some(template) = &options.output_template {
            args.push("-o".to_string());
            args.push(template.to_string_lossy().into_owned());
        }

        if let Some(proxy) = &options.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        // Everything after `--` is positional, even a URL starting with '-'
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Parse stdout of a successful run.
    ///
    /// The first JSON object line is the info document; in fetch mode the
    /// last non-JSON line is the final file path. Lines are handled as raw
    /// bytes so a path that is not valid UTF-8 survives intact.
    pub fn parse_stdout(stdout: &[u8], mode: ExtractionMode) -> Result<Extraction, DownloadError> {
        let mut info: Option<Value> = None;
        let mut file: Option<PathBuf> = None;

        for line in stdout.split(|b| *b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let trimmed = line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with(b"{") {
                if info.is_none() {
                    let parsed = serde_json::from_slice(trimmed)
                        .map_err(|e| DownloadError::Parse(format!("Invalid JSON: {}", e)))?;
                    info = Some(parsed);
                }
            } else if mode == ExtractionMode::Fetch {
                file = Some(path_from_bytes(line));
            }
        }

        let info = info.ok_or_else(|| DownloadError::Parse("No info JSON in output".to_string()))?;

        Ok(Extraction { info, file })
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[async_trait]
impl Extractor for YtDlpCli {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<Extraction, DownloadError> {
        let args = Self::build_args(url, options);
        let mode = options.mode();

        tracing::debug!(
            program = %self.ytdlp_path.display(),
            args = %redact_credentials(&args.join(" ")),
            ?mode,
            "Running yt-dlp"
        );

        let output = run_output(&self.ytdlp_path, &args).await?;

        if !output.status.success() {
            return Err(DownloadError::Extraction(failure_message(
                &output.stderr,
                output.status,
            )));
        }

        Self::parse_stdout(&output.stdout, mode)
    }
}
