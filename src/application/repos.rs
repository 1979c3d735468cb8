//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::domain::entities::{AuthorRecord, AuthoredPost, PostRecord};
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Filters applied to the published-post listing. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishedPostFilter {
    pub search: Option<String>,
    pub published_after: Option<OffsetDateTime>,
    pub published_before: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    PublishedAt,
    CreatedAt,
}

impl OrderField {
    pub fn column(self) -> &'static str {
        match self {
            OrderField::PublishedAt => "published_at",
            OrderField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    pub field: OrderField,
    pub descending: bool,
}

/// Sort order for the listing. Repositories always finish with `id DESC`
/// so that page boundaries stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOrdering {
    terms: Vec<OrderTerm>,
}

impl PostOrdering {
    /// Build an ordering from explicit terms, falling back to the default when
    /// none are given.
    pub fn new(terms: Vec<OrderTerm>) -> Self {
        if terms.is_empty() {
            Self::default()
        } else {
            Self { terms }
        }
    }

    pub fn terms(&self) -> &[OrderTerm] {
        &self.terms
    }
}

impl Default for PostOrdering {
    fn default() -> Self {
        Self {
            terms: vec![OrderTerm {
                field: OrderField::PublishedAt,
                descending: true,
            }],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub slug: String,
    pub body_markdown: String,
    pub author_id: Uuid,
    pub status: PostStatus,
    pub created_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body_markdown: String,
    pub author_id: Uuid,
    pub status: PostStatus,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct CreateAuthorParams {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// Look up a post by slug regardless of status.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Look up a published post by slug along with its author.
    async fn find_published_by_slug(&self, slug: &str)
    -> Result<Option<AuthoredPost>, RepoError>;

    async fn count_published(&self, filter: &PublishedPostFilter) -> Result<u64, RepoError>;

    async fn list_published(
        &self,
        filter: &PublishedPostFilter,
        ordering: &PostOrdering,
        window: PageWindow,
    ) -> Result<Vec<PostRecord>, RepoError>;

    /// Count posts, optionally restricted to one status.
    async fn count_by_status(&self, status: Option<PostStatus>) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_all_posts(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthorRecord>, RepoError>;

    /// Return the author with `params.username`, creating it when missing.
    /// The flag reports whether a new row was inserted.
    async fn get_or_create(
        &self,
        params: CreateAuthorParams,
    ) -> Result<(AuthorRecord, bool), RepoError>;
}
