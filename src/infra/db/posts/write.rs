use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::super::PostgresRepositories;
use super::types::PostRow;

const RETURNING_POST: &str = "RETURNING id, title, slug, body_markdown, author_id, status, \
    created_at, updated_at, published_at";

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            slug,
            body_markdown,
            author_id,
            status,
            created_at,
            published_at,
        } = params;

        let sql = format!(
            "INSERT INTO posts (
                id, title, slug, body_markdown, author_id, status,
                created_at, updated_at, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8)
            {RETURNING_POST}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(slug)
            .bind(body_markdown)
            .bind(author_id)
            .bind(status)
            .bind(created_at)
            .bind(published_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            slug,
            body_markdown,
            author_id,
            status,
            updated_at,
            published_at,
        } = params;

        let sql = format!(
            "UPDATE posts
            SET title = $2,
                slug = $3,
                body_markdown = $4,
                author_id = $5,
                status = $6,
                updated_at = $7,
                published_at = $8
            WHERE id = $1
            {RETURNING_POST}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(title)
            .bind(slug)
            .bind(body_markdown)
            .bind(author_id)
            .bind(status)
            .bind(updated_at)
            .bind(published_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_all_posts(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM posts")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
