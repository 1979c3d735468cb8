use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{PostOrdering, PostsRepo, PublishedPostFilter, RepoError};
use crate::domain::entities::{AuthoredPost, PostRecord};
use crate::domain::types::PostStatus;
use crate::infra::db::map_sqlx_error;

use super::super::{AUTHOR_COLUMNS, POST_COLUMNS, POSTS_WITH_AUTHORS, PostgresRepositories};
use super::types::{AuthoredPostRow, PostRow};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.slug = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<AuthoredPost>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(", ");
        qb.push(AUTHOR_COLUMNS);
        qb.push(POSTS_WITH_AUTHORS);
        qb.push("WHERE p.slug = ");
        qb.push_bind(slug);
        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);

        let row = qb
            .build_query_as::<AuthoredPostRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(AuthoredPost::from))
    }

    async fn count_published(&self, filter: &PublishedPostFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        qb.push(POSTS_WITH_AUTHORS);
        qb.push("WHERE 1=1");
        Self::apply_published_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_published(
        &self,
        filter: &PublishedPostFilter,
        ordering: &PostOrdering,
        window: PageWindow,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let offset = i64::try_from(window.offset).map_err(|_| RepoError::InvalidInput {
            message: format!("page offset {} is out of range", window.offset),
        })?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(POSTS_WITH_AUTHORS);
        qb.push("WHERE 1=1");
        Self::apply_published_filter(&mut qb, filter);
        Self::push_ordering(&mut qb, ordering);
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(window.limit));
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_by_status(&self, status: Option<PostStatus>) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        if let Some(status) = status {
            qb.push(" WHERE p.status = ");
            qb.push_bind(status);
        }

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}
