//! Postgres-backed repository implementations.

mod authors;
mod posts;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
};

use crate::application::repos::{PostOrdering, PublishedPostFilter, RepoError};
use crate::domain::types::PostStatus;

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.body_markdown, p.author_id, p.status, \
    p.created_at, p.updated_at, p.published_at";

const AUTHOR_COLUMNS: &str = "a.username AS author_username, a.first_name AS author_first_name, \
    a.last_name AS author_last_name, a.created_at AS author_created_at";

const POSTS_WITH_AUTHORS: &str = " FROM posts p INNER JOIN authors a ON a.id = p.author_id ";

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }

    fn apply_published_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PublishedPostFilter) {
        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);

        if let Some(after) = filter.published_after {
            qb.push(" AND p.published_at >= ");
            qb.push_bind(after);
        }

        if let Some(before) = filter.published_before {
            qb.push(" AND p.published_at <= ");
            qb.push_bind(before);
        }

        if let Some(search) = filter.search.as_ref() {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (p.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.body_markdown ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.first_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.last_name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }

    fn push_ordering(qb: &mut QueryBuilder<'_, Postgres>, ordering: &PostOrdering) {
        qb.push(" ORDER BY ");
        for term in ordering.terms() {
            qb.push("p.");
            qb.push(term.field.column());
            qb.push(if term.descending {
                " DESC NULLS LAST, "
            } else {
                " ASC NULLS LAST, "
            });
        }
        qb.push("p.id DESC");
    }

    fn convert_count(value: i64) -> Result<u64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
