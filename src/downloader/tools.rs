// Locating and probing the yt-dlp binary

use std::path::{Path, PathBuf};
use tokio::process::Command;

pub const YTDLP: &str = "yt-dlp";

/// Install locations checked before falling back to `PATH`
const COMMON_PATHS: &[&str] = &[
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
];

/// Pick the yt-dlp binary: explicit override, then common install paths,
/// then a `PATH` lookup. Falls back to the bare name so spawn errors name
/// the missing tool.
pub fn find_ytdlp(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = COMMON_PATHS.iter().map(Path::new).find(|p| p.is_file()) {
        return path.to_path_buf();
    }

    which::which(YTDLP).unwrap_or_else(|_| PathBuf::from(YTDLP))
}

/// Run `<binary> --version`, returning the trimmed version string.
pub async fn get_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary).arg("--version").output().await.ok()?;

    if !output.status.success() {
        return None;
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let p = find_ytdlp(Some(Path::new("/custom/yt-dlp")));
        assert_eq!(p, PathBuf::from("/custom/yt-dlp"));
    }

    #[tokio::test]
    async fn missing_binary_has_no_version() {
        let v = get_version(Path::new("/nonexistent/yt-dlp-binary")).await;
        assert_eq!(v, None);
    }
}
