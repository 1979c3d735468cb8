use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Raw listing parameters. Parsing happens in the application layer so
/// that malformed values produce typed errors.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub search: Option<String>,
    pub published_after: Option<String>,
    pub published_before: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListItem {
    pub title: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PostListItem>,
}
