use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{PageNumber, PaginationError};
use crate::application::repos::{PostOrdering, PublishedPostFilter, RepoError};
use crate::domain::{error::DomainError, slug::SlugError, types::PostStatus};

#[derive(Debug, Error)]
pub enum PostStoreError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("a post with slug `{0}` already exists")]
    DuplicateSlug(String),
    #[error("cannot derive a slug from the title: {0}")]
    Slug(#[from] SlugError),
    #[error("author `{0}` does not exist")]
    UnknownAuthor(Uuid),
    #[error("post `{0}` does not exist")]
    NotFound(Uuid),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum PostReadError {
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostQueryError {
    #[error("invalid `{param}` value `{value}`: expected an ISO-8601 timestamp")]
    InvalidDate { param: &'static str, value: String },
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    /// Explicit slug; derived from the title when absent.
    pub slug: Option<String>,
    pub body_markdown: String,
    pub author_id: Uuid,
    pub status: PostStatus,
}

/// Parsed listing request: filter, sort order and page.
#[derive(Debug, Clone, Default)]
pub struct PublishedPostQuery {
    pub filter: PublishedPostFilter,
    pub ordering: PostOrdering,
    pub page: PageNumber,
}

/// A published post prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub slug: String,
    /// Sanitised HTML, or the stored markdown when rendering failed.
    pub body: String,
    pub author: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
