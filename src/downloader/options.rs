// Builds extractor options from a request and process configuration

use std::path::Path;

use super::models::{ExtractionOptions, ExtractionRequest};
use crate::config::AppConfig;

/// yt-dlp output template: file named after the title with its native extension
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Options for a metadata-only lookup (`/info`, `/formats`).
pub fn resolve_inspect(_request: &ExtractionRequest, config: &AppConfig) -> ExtractionOptions {
    ExtractionOptions {
        format_selector: None,
        output_template: None,
        proxy: config.proxy().map(str::to_string),
        quiet: true,
    }
}

/// Options for a download into `workspace_dir`.
pub fn resolve_fetch(
    request: &ExtractionRequest,
    config: &AppConfig,
    workspace_dir: &Path,
) -> ExtractionOptions {
    ExtractionOptions {
        format_selector: Some(request.format_selector.clone()),
        output_template: Some(workspace_dir.join(OUTPUT_TEMPLATE)),
        proxy: config.proxy().map(str::to_string),
        quiet: true,
    }
}
