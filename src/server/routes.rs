//! Route handlers.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use super::error::ApiError;
use super::responses::{self, FormatList};
use super::AppContext;
use crate::downloader::{adapter, options, ExtractionRequest, MediaMetadata, Workspace};

/// Raw query pairs, in request order
type QueryPairs = Query<Vec<(String, String)>>;

/// Query parameters shared by `/info`, `/formats` and `/download`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MediaQuery {
    pub url: Option<String>,
    pub format: Option<String>,
}

impl MediaQuery {
    /// Pick `url` and `format` out of the query. A repeated key keeps its
    /// first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "url" if q.url.is_none() => q.url = Some(value),
                "format" if q.format.is_none() => q.format = Some(value),
                _ => {}
            }
        }
        q
    }
}

fn parse_request(Query(pairs): QueryPairs) -> Result<ExtractionRequest, ApiError> {
    let q = MediaQuery::from_pairs(pairs);
    ExtractionRequest::new(q.url, q.format).ok_or(ApiError::MissingUrl)
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/info": "GET - media metadata (params: url)",
            "/formats": "GET - available formats (params: url)",
            "/download": "GET - download media (params: url, format)",
            "/health": "GET - health check",
        }
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// GET /info?url=
pub async fn info(
    State(ctx): State<AppContext>,
    query: QueryPairs,
) -> Result<Json<MediaMetadata>, ApiError> {
    let request = parse_request(query)?;
    let opts = options::resolve_inspect(&request, &ctx.config);

    let info = adapter::inspect(ctx.extractor.as_ref(), &request, &opts).await?;
    Ok(Json(responses::metadata(&info)))
}

/// GET /formats?url=
pub async fn formats(
    State(ctx): State<AppContext>,
    query: QueryPairs,
) -> Result<Json<FormatList>, ApiError> {
    let request = parse_request(query)?;
    let opts = options::resolve_inspect(&request, &ctx.config);

    let info = adapter::inspect(ctx.extractor.as_ref(), &request, &opts).await?;
    Ok(Json(responses::format_list(&info)))
}

/// GET /download?url=&format=
pub async fn download(
    State(ctx): State<AppContext>,
    query: QueryPairs,
) -> Result<Response, ApiError> {
    let request = parse_request(query)?;

    let workspace = Workspace::create(ctx.config.download_dir.clone()).await?;
    let opts = options::resolve_fetch(&request, &ctx.config, workspace.path());

    tracing::info!(
        url = %request.source_url,
        format = %request.format_selector,
        dir = %workspace.path().display(),
        "Starting download"
    );

    let artifact = adapter::fetch(ctx.extractor.as_ref(), &request, &opts, workspace).await?;
    responses::attachment(artifact).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let q = MediaQuery::from_pairs(pairs(&[
            ("url", "https://a.example/v"),
            ("format", "18"),
            ("url", "https://b.example/v"),
            ("format", "22"),
        ]));

        assert_eq!(q.url.as_deref(), Some("https://a.example/v"));
        assert_eq!(q.format.as_deref(), Some("18"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let q = MediaQuery::from_pairs(pairs(&[("list", "PL1"), ("t", "30")]));
        assert_eq!(q, MediaQuery::default());
    }
}
