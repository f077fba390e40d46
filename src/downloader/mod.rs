// Downloader module - everything between an HTTP request and yt-dlp

pub mod adapter;
pub mod errors;
pub mod extractors;
pub mod models;
pub mod options;
pub mod tools;
pub mod traits;
pub mod utils;
pub mod workspace;

pub use errors::{DownloadError, FailureKind};
pub use extractors::YtDlpCli;
pub use models::{
    DownloadedArtifact, Extraction, ExtractionMode, ExtractionOptions, ExtractionRequest,
    FormatDescriptor, MediaMetadata,
};
pub use traits::Extractor;
pub use workspace::Workspace;
