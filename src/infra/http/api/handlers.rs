use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use url::form_urlencoded;

use crate::application::posts::{PostDetail, PublishedPostQuery};

use super::error::ApiError;
use super::models::{PostListItem, PostListParams, PostListResponse};
use super::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    uri: Uri,
    params: Result<Query<PostListParams>, QueryRejection>,
) -> Result<Json<PostListResponse>, ApiError> {
    let Query(params) = params
        .map_err(|err| ApiError::bad_request("Malformed query string", Some(err.body_text())))?;

    let query = PublishedPostQuery::parse(
        params.search.as_deref(),
        params.published_after.as_deref(),
        params.published_before.as_deref(),
        params.ordering.as_deref(),
        params.page.as_deref(),
    )?;

    let page = state.posts.list_published(&query).await?;

    let next = page
        .next_page()
        .map(|number| state.absolute(&page_link(&uri, number)));
    let previous = page
        .previous_page()
        .map(|number| state.absolute(&page_link(&uri, number)));

    let page = page.map(|post| PostListItem {
        url: state.absolute(&post_path(&post.slug)),
        title: post.title,
        published_at: post.published_at,
    });

    Ok(Json(PostListResponse {
        count: page.count,
        next,
        previous,
        results: page.results,
    }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    let detail = state.posts.get_published(&slug).await?;
    Ok(Json(detail))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Resource not found")
}

pub(crate) fn post_path(slug: &str) -> String {
    format!("/api/v1/posts/{slug}/")
}

/// The request path and query with `page` replaced by `number`. Page one is
/// expressed by leaving `page` out.
pub(crate) fn page_link(uri: &Uri, number: u32) -> String {
    let query = uri.query().unwrap_or_default();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != "page" {
            serializer.append_pair(&key, &value);
        }
    }
    if number > 1 {
        serializer.append_pair("page", &number.to_string());
    }

    let query = serializer.finish();
    if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    }
}
