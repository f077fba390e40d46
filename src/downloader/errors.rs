// Error types for the extraction adapter

use std::fmt;
use std::path::PathBuf;

/// Failure of a single extraction or download attempt.
///
/// The `Display` output is what callers see in the `error` field of the
/// JSON body, so extractor messages are carried through untouched.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// yt-dlp binary could not be started
    #[error("Failed to start {program}: {source}")]
    ToolNotFound {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The extractor ran and reported a failure
    #[error("{0}")]
    Extraction(String),

    /// The extractor succeeded but its output could not be understood
    #[error("Failed to parse extractor output: {0}")]
    Parse(String),

    /// The request-scoped temp directory could not be created
    #[error("Failed to create download directory: {0}")]
    Workspace(#[source] std::io::Error),

    /// Extraction reported success but no file exists where it should
    #[error("Download failed")]
    ArtifactMissing(Option<PathBuf>),
}

/// Coarse failure category, used for log fields only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ToolMissing,
    Network,
    Proxy,
    Blocked,
    Unavailable,
    UnsupportedUrl,
    Artifact,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ToolMissing => "tool_missing",
            Self::Network => "network",
            Self::Proxy => "proxy",
            Self::Blocked => "blocked",
            Self::Unavailable => "unavailable",
            Self::UnsupportedUrl => "unsupported_url",
            Self::Artifact => "artifact",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl DownloadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ToolNotFound { .. } => FailureKind::ToolMissing,
            Self::ArtifactMissing(_) => FailureKind::Artifact,
            Self::Workspace(_) | Self::Parse(_) => FailureKind::Other,
            Self::Extraction(msg) => classify_message(msg),
        }
    }
}

/// Guess a category from yt-dlp's error text.
fn classify_message(msg: &str) -> FailureKind {
    let s = msg.to_lowercase();

    // Proxy errors also mention connection failures, so check them first
    if s.contains("proxy") || s.contains("socks") {
        return FailureKind::Proxy;
    }

    if s.contains("unsupported url") {
        return FailureKind::UnsupportedUrl;
    }

    if s.contains("429")
        || s.contains("403")
        || s.contains("too many requests")
        || s.contains("confirm you're not a bot")
        || s.contains("sign in to confirm")
    {
        return FailureKind::Blocked;
    }

    if s.contains("private video")
        || s.contains("video unavailable")
        || s.contains("has been removed")
        || s.contains("not available")
    {
        return FailureKind::Unavailable;
    }

    if s.contains("timed out")
        || s.contains("timeout")
        || s.contains("unable to download webpage")
        || s.contains("connection")
        || s.contains("name or service not known")
    {
        return FailureKind::Network;
    }

    FailureKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_message_is_verbatim() {
        let msg = "ERROR: [youtube] abc: Video unavailable";
        let err = DownloadError::Extraction(msg.to_string());
        assert_eq!(err.to_string(), msg);
    }

    #[test]
    fn artifact_missing_has_fixed_message() {
        let err = DownloadError::ArtifactMissing(Some(PathBuf::from("/tmp/x/a.mp4")));
        assert_eq!(err.to_string(), "Download failed");
        assert_eq!(err.kind(), FailureKind::Artifact);
    }

    #[test]
    fn classifies_common_failures() {
        let cases = [
            ("ERROR: Unsupported URL: https://example.com", FailureKind::UnsupportedUrl),
            ("ERROR: [youtube] x: Private video. Sign in if you've been granted access", FailureKind::Unavailable),
            ("ERROR: Unable to download webpage: timed out", FailureKind::Network),
            ("ERROR: Unable to connect to proxy", FailureKind::Proxy),
            ("ERROR: HTTP Error 429: Too Many Requests", FailureKind::Blocked),
            ("ERROR: something odd", FailureKind::Other),
        ];

        for (msg, expected) in cases {
            let err = DownloadError::Extraction(msg.to_string());
            assert_eq!(err.kind(), expected, "{msg}");
        }
    }
}
