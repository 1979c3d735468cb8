use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, AuthoredPost, PostRecord};
use crate::domain::types::PostStatus;

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) body_markdown: String,
    pub(crate) author_id: Uuid,
    pub(crate) status: PostStatus,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) published_at: Option<OffsetDateTime>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            body_markdown: row.body_markdown,
            author_id: row.author_id,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        }
    }
}

/// A post row joined with the columns of its author, prefixed `author_`.
#[derive(sqlx::FromRow)]
pub(crate) struct AuthoredPostRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRow,
    pub(crate) author_username: String,
    pub(crate) author_first_name: String,
    pub(crate) author_last_name: String,
    pub(crate) author_created_at: OffsetDateTime,
}

impl From<AuthoredPostRow> for AuthoredPost {
    fn from(row: AuthoredPostRow) -> Self {
        let author = AuthorRecord {
            id: row.post.author_id,
            username: row.author_username,
            first_name: row.author_first_name,
            last_name: row.author_last_name,
            created_at: row.author_created_at,
        };
        Self {
            post: PostRecord::from(row.post),
            author,
        }
    }
}
