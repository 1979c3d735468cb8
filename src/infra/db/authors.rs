use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AuthorsRepo, CreateAuthorParams, RepoError};
use crate::domain::entities::AuthorRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    created_at: OffsetDateTime,
}

impl From<AuthorRow> for AuthorRecord {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
        }
    }
}

const AUTHOR_SELECT: &str = "SELECT id, username, first_name, last_name, created_at FROM authors";

#[async_trait]
impl AuthorsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        let sql = format!("{AUTHOR_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, AuthorRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(AuthorRecord::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthorRecord>, RepoError> {
        let sql = format!("{AUTHOR_SELECT} WHERE username = $1");
        let row = sqlx::query_as::<_, AuthorRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(AuthorRecord::from))
    }

    async fn get_or_create(
        &self,
        params: CreateAuthorParams,
    ) -> Result<(AuthorRecord, bool), RepoError> {
        let inserted = sqlx::query_as::<_, AuthorRow>(
            "INSERT INTO authors (id, username, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, first_name, last_name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&params.username)
        .bind(&params.first_name)
        .bind(&params.last_name)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if let Some(row) = inserted {
            return Ok((AuthorRecord::from(row), true));
        }

        // The username already exists; nothing was written.
        let existing = self
            .find_by_username(&params.username)
            .await?
            .ok_or(RepoError::NotFound)?;
        Ok((existing, false))
    }
}
