// Extractor trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{Extraction, ExtractionOptions};

/// An external tool that can describe a media URL and optionally download it.
///
/// When `options.output_template` is set the implementation must download the
/// selected format there and report the final file path if it knows it.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<Extraction, DownloadError>;
}
