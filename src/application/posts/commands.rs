use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{stamp_publication, validate_body, validate_title};
use crate::domain::slug::{SlugAsyncError, generate_unique_slug_async, validate_slug};
use crate::domain::types::PostStatus;

use super::service::PostStore;
use super::types::{CreatePostCommand, PostStoreError};

impl PostStore {
    /// Create a post. An explicit slug that already exists is rejected before
    /// anything is written; without one, a free slug is derived from the title.
    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, PostStoreError> {
        validate_title(&command.title)?;
        validate_body(&command.body_markdown)?;

        if self.authors.find_by_id(command.author_id).await?.is_none() {
            return Err(PostStoreError::UnknownAuthor(command.author_id));
        }

        let slug = match command.slug {
            Some(slug) => {
                let slug = slug.trim().to_string();
                validate_slug(&slug)?;
                if self.reader.find_by_slug(&slug).await?.is_some() {
                    return Err(PostStoreError::DuplicateSlug(slug));
                }
                slug
            }
            None => self.derive_free_slug(&command.title).await?,
        };

        let now = OffsetDateTime::now_utc();
        let params = CreatePostParams {
            title: command.title,
            slug: slug.clone(),
            body_markdown: command.body_markdown,
            author_id: command.author_id,
            status: command.status,
            created_at: now,
            published_at: stamp_publication(command.status, None, now),
        };

        let post = self
            .writer
            .create_post(params)
            .await
            .map_err(|err| duplicate_as_slug_error(err, &slug))?;

        info!(
            target = "postline::application::posts",
            post_id = %post.id,
            slug = %post.slug,
            status = %post.status,
            "post created"
        );

        Ok(post)
    }

    /// Persist the given post. While the post is published, every save moves
    /// `published_at` to the current time.
    pub async fn save(&self, post: PostRecord) -> Result<PostRecord, PostStoreError> {
        validate_title(&post.title)?;
        validate_body(&post.body_markdown)?;
        validate_slug(&post.slug)?;

        let owner = self.reader.find_by_slug(&post.slug).await?;
        if owner.is_some_and(|existing| existing.id != post.id) {
            return Err(PostStoreError::DuplicateSlug(post.slug));
        }

        let now = OffsetDateTime::now_utc();
        let params = UpdatePostParams {
            id: post.id,
            title: post.title,
            slug: post.slug.clone(),
            body_markdown: post.body_markdown,
            author_id: post.author_id,
            status: post.status,
            updated_at: now,
            published_at: stamp_publication(post.status, post.published_at, now),
        };

        let saved = self
            .writer
            .update_post(params)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => PostStoreError::NotFound(post.id),
                other => duplicate_as_slug_error(other, &post.slug),
            })?;

        Ok(saved)
    }

    /// Move a post to `status` and save it.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: PostStatus,
    ) -> Result<PostRecord, PostStoreError> {
        let mut post = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(PostStoreError::NotFound(id))?;

        let previous = post.status;
        post.status = status;
        let saved = self.save(post).await?;

        info!(
            target = "postline::application::posts",
            post_id = %saved.id,
            from = %previous,
            to = %saved.status,
            "post status changed"
        );

        Ok(saved)
    }

    async fn derive_free_slug(&self, title: &str) -> Result<String, PostStoreError> {
        let reader = self.reader.clone();
        generate_unique_slug_async(title, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await
        .map_err(|err| match err {
            SlugAsyncError::Slug(err) => PostStoreError::Slug(err),
            SlugAsyncError::Predicate(err) => PostStoreError::Repo(err),
        })
    }
}

// A concurrent insert can still hit the unique index after the pre-check.
fn duplicate_as_slug_error(err: RepoError, slug: &str) -> PostStoreError {
    match err {
        RepoError::Duplicate { .. } => PostStoreError::DuplicateSlug(slug.to_string()),
        other => PostStoreError::Repo(other),
    }
}
