//! ytdlp-api: a small HTTP API in front of yt-dlp.
//!
//! - `GET /info` and `GET /formats` describe a media URL
//! - `GET /download` fetches it into a per-request temp directory and
//!   streams the file back
//! - `GET /health` and `GET /` for health checks and discovery

pub mod config;
pub mod downloader;
pub mod server;

pub use config::AppConfig;
pub use server::{build_router, AppContext};
