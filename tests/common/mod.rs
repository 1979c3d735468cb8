//! In-memory repositories shared by the router tests.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use postline::application::pagination::PageWindow;
use postline::application::repos::{
    AuthorsRepo, CreateAuthorParams, CreatePostParams, PostOrdering, PostsRepo, PostsWriteRepo,
    PublishedPostFilter, RepoError, UpdatePostParams,
};
use postline::domain::entities::{AuthorRecord, AuthoredPost, PostRecord};
use postline::domain::types::PostStatus;

#[derive(Default)]
pub struct MemoryRepo {
    authors: Mutex<Vec<AuthorRecord>>,
    posts: Mutex<Vec<PostRecord>>,
}

impl MemoryRepo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn add_author(&self, username: &str, first: &str, last: &str) -> AuthorRecord {
        let author = AuthorRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.authors.lock().await.push(author.clone());
        author
    }

    /// Store a post exactly as given, bypassing publication stamping.
    pub async fn insert(
        &self,
        author: &AuthorRecord,
        slug: &str,
        status: PostStatus,
        created_at: OffsetDateTime,
        published_at: Option<OffsetDateTime>,
    ) -> PostRecord {
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: format!("Post {slug}"),
            slug: slug.to_string(),
            body_markdown: format!("Body of {slug}"),
            author_id: author.id,
            status,
            created_at,
            updated_at: created_at,
            published_at,
        };
        self.posts.lock().await.push(post.clone());
        post
    }

    async fn author_of(&self, post: &PostRecord) -> Option<AuthorRecord> {
        self.authors
            .lock()
            .await
            .iter()
            .find(|author| author.id == post.author_id)
            .cloned()
    }

    async fn matching(&self, filter: &PublishedPostFilter) -> Vec<PostRecord> {
        let posts = self.posts.lock().await.clone();
        let authors = self.authors.lock().await.clone();
        posts
            .into_iter()
            .filter(|post| {
                let author = authors.iter().find(|author| author.id == post.author_id);
                matches_filter(post, author, filter)
            })
            .collect()
    }
}

fn matches_filter(
    post: &PostRecord,
    author: Option<&AuthorRecord>,
    filter: &PublishedPostFilter,
) -> bool {
    if post.status != PostStatus::Published {
        return false;
    }
    let too_early = filter
        .published_after
        .is_some_and(|after| post.published_at.is_none_or(|at| at < after));
    let too_late = filter
        .published_before
        .is_some_and(|before| post.published_at.is_none_or(|at| at > before));
    if too_early || too_late {
        return false;
    }
    match filter.search.as_deref() {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            let mut haystacks = vec![post.title.to_lowercase(), post.body_markdown.to_lowercase()];
            if let Some(author) = author {
                haystacks.push(author.first_name.to_lowercase());
                haystacks.push(author.last_name.to_lowercase());
            }
            haystacks.iter().any(|value| value.contains(&term))
        }
    }
}

fn compare(a: &PostRecord, b: &PostRecord, ordering: &PostOrdering) -> Ordering {
    for term in ordering.terms() {
        let (left, right) = match term.field.column() {
            "created_at" => (Some(a.created_at), Some(b.created_at)),
            _ => (a.published_at, b.published_at),
        };
        let ord = if term.descending {
            right.cmp(&left)
        } else {
            left.cmp(&right)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    b.id.cmp(&a.id)
}

#[async_trait]
impl PostsRepo for MemoryRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.posts.lock().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<AuthoredPost>, RepoError> {
        let Some(post) = PostsRepo::find_by_slug(self, slug).await? else {
            return Ok(None);
        };
        if post.status != PostStatus::Published {
            return Ok(None);
        }
        let author = self.author_of(&post).await.ok_or(RepoError::NotFound)?;
        Ok(Some(AuthoredPost { post, author }))
    }

    async fn count_published(&self, filter: &PublishedPostFilter) -> Result<u64, RepoError> {
        Ok(self.matching(filter).await.len() as u64)
    }

    async fn list_published(
        &self,
        filter: &PublishedPostFilter,
        ordering: &PostOrdering,
        window: PageWindow,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut posts = self.matching(filter).await;
        posts.sort_by(|a, b| compare(a, b, ordering));
        Ok(posts
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect())
    }

    async fn count_by_status(&self, status: Option<PostStatus>) -> Result<u64, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .filter(|post| status.is_none_or(|wanted| post.status == wanted))
            .count() as u64)
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepo {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        if posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            body_markdown: params.body_markdown,
            author_id: params.author_id,
            status: params.status,
            created_at: params.created_at,
            updated_at: params.created_at,
            published_at: params.published_at,
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.slug = params.slug;
        post.body_markdown = params.body_markdown;
        post.author_id = params.author_id;
        post.status = params.status;
        post.updated_at = params.updated_at;
        post.published_at = params.published_at;
        Ok(post.clone())
    }

    async fn delete_all_posts(&self) -> Result<u64, RepoError> {
        let mut posts = self.posts.lock().await;
        let removed = posts.len() as u64;
        posts.clear();
        Ok(removed)
    }
}

#[async_trait]
impl AuthorsRepo for MemoryRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self
            .authors
            .lock()
            .await
            .iter()
            .find(|author| author.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthorRecord>, RepoError> {
        Ok(self
            .authors
            .lock()
            .await
            .iter()
            .find(|author| author.username == username)
            .cloned())
    }

    async fn get_or_create(
        &self,
        params: CreateAuthorParams,
    ) -> Result<(AuthorRecord, bool), RepoError> {
        if let Some(existing) = self.find_by_username(&params.username).await? {
            return Ok((existing, false));
        }
        let author = self
            .add_author(&params.username, &params.first_name, &params.last_name)
            .await;
        Ok((author, true))
    }
}
