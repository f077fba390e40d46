// Extractor implementations
//
// Only the yt-dlp CLI is wired up; tests substitute their own `Extractor`.

mod cli;

pub use cli::YtDlpCli;
