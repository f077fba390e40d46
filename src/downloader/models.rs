// Request and response data models

use serde::Serialize;
use serde_json::{Number, Value};
use std::path::PathBuf;

use super::workspace::Workspace;

pub const DEFAULT_FORMAT: &str = "best";

/// A validated request to look up or fetch a media URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub source_url: String,
    pub format_selector: String,
}

impl ExtractionRequest {
    /// Returns `None` when `url` is absent or empty.
    pub fn new(url: Option<String>, format: Option<String>) -> Option<Self> {
        let source_url = url.filter(|u| !u.is_empty())?;
        let format_selector = format
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        Some(Self {
            source_url,
            format_selector,
        })
    }
}

/// Extraction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Metadata only, nothing is written to disk
    Inspect,
    /// Metadata plus a real download into the output template
    Fetch,
}

/// Options handed to the extractor for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// `-f` expression, only set for downloads
    pub format_selector: Option<String>,
    /// Output path template, only set for downloads
    pub output_template: Option<PathBuf>,
    pub proxy: Option<String>,
    /// Suppress progress and warnings
    pub quiet: bool,
}

impl ExtractionOptions {
    pub fn mode(&self) -> ExtractionMode {
        if self.output_template.is_some() {
            ExtractionMode::Fetch
        } else {
            ExtractionMode::Inspect
        }
    }
}

/// Raw result of a successful extractor run
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Info document as reported by yt-dlp
    pub info: Value,
    /// Final path of the downloaded file, if the extractor reported one
    pub file: Option<PathBuf>,
}

/// Media metadata returned by `/info`.
///
/// Every field is optional and serialized as `null` when the extractor did
/// not report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub duration: Option<Number>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub view_count: Option<u64>,
}

impl MediaMetadata {
    pub fn from_info(info: &Value) -> Self {
        Self {
            title: string_field(info, "title"),
            duration: number_field(info, "duration"),
            uploader: string_field(info, "uploader"),
            thumbnail: string_field(info, "thumbnail"),
            description: string_field(info, "description"),
            view_count: info.get("view_count").and_then(Value::as_u64),
        }
    }
}

/// One available encoding, as listed by `/formats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatDescriptor {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
    pub format_note: Option<String>,
}

impl FormatDescriptor {
    pub fn from_format(f: &Value) -> Self {
        Self {
            format_id: string_field(f, "format_id"),
            ext: string_field(f, "ext"),
            resolution: string_field(f, "resolution"),
            filesize: f.get("filesize").and_then(Value::as_u64),
            format_note: string_field(f, "format_note"),
        }
    }

    /// Map the `formats` array of an info document, keeping its order.
    /// A missing or non-array `formats` key yields an empty list.
    pub fn list_from_info(info: &Value) -> Vec<Self> {
        info.get("formats")
            .and_then(Value::as_array)
            .map(|formats| formats.iter().map(Self::from_format).collect())
            .unwrap_or_default()
    }
}

/// A downloaded file together with the directory that owns it
#[derive(Debug)]
pub struct DownloadedArtifact {
    pub workspace: Workspace,
    pub path: PathBuf,
    pub suggested_filename: String,
}

fn string_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn number_field(v: &Value, key: &str) -> Option<Number> {
    match v.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_requires_non_empty_url() {
        assert_eq!(ExtractionRequest::new(None, None), None);
        assert_eq!(ExtractionRequest::new(Some(String::new()), None), None);

        let req = ExtractionRequest::new(Some("https://a.b/c".into()), None).unwrap();
        assert_eq!(req.format_selector, "best");

        let req = ExtractionRequest::new(Some("https://a.b/c".into()), Some("140".into())).unwrap();
        assert_eq!(req.format_selector, "140");
    }

    #[test]
    fn metadata_missing_fields_serialize_as_null() {
        let info = json!({
            "title": "Clip",
            "duration": 12.5,
            "view_count": 42,
            "extractor": "generic"
        });

        let meta = MediaMetadata::from_info(&info);
        let out = serde_json::to_value(&meta).unwrap();
        let obj = out.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        assert_eq!(out["title"], "Clip");
        assert_eq!(out["duration"], 12.5);
        assert_eq!(out["view_count"], 42);
        assert!(out["uploader"].is_null());
        assert!(out["thumbnail"].is_null());
        assert!(out["description"].is_null());
    }

    #[test]
    fn integer_duration_stays_integer() {
        let meta = MediaMetadata::from_info(&json!({ "duration": 212 }));
        let out = serde_json::to_string(&meta.duration).unwrap();
        assert_eq!(out, "212");
    }

    #[test]
    fn mistyped_fields_become_null() {
        let meta = MediaMetadata::from_info(&json!({ "title": 5, "view_count": "many" }));
        assert_eq!(meta.title, None);
        assert_eq!(meta.view_count, None);
    }

    #[test]
    fn formats_keep_order_and_shape() {
        let info = json!({
            "formats": [
                { "format_id": "18", "ext": "mp4", "resolution": "640x360", "filesize": 1000, "format_note": "360p", "vcodec": "avc1" },
                { "format_id": "140", "ext": "m4a", "resolution": "audio only" },
                { "format_id": "137", "ext": "mp4", "filesize": null }
            ]
        });

        let formats = FormatDescriptor::list_from_info(&info);
        let ids: Vec<_> = formats.iter().map(|f| f.format_id.as_deref().unwrap()).collect();
        assert_eq!(ids, ["18", "140", "137"]);

        let out = serde_json::to_value(&formats[1]).unwrap();
        assert_eq!(out.as_object().unwrap().len(), 5);
        assert!(out["filesize"].is_null());
        assert!(out["format_note"].is_null());
    }

    #[test]
    fn no_formats_key_is_empty_list() {
        assert!(FormatDescriptor::list_from_info(&json!({ "title": "x" })).is_empty());
    }
}
