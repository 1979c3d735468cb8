use tracing::warn;

use crate::application::pagination::{NumberedPage, PAGE_SIZE};
use crate::application::render::RenderRequest;
use crate::domain::authors::display_name;
use crate::domain::entities::{AuthoredPost, PostRecord};

use super::service::PostReader;
use super::types::{PostDetail, PostReadError, PublishedPostQuery};

impl PostReader {
    /// One page of published posts matching the query. Pages past the end
    /// come back empty with the full `count`.
    pub async fn list_published(
        &self,
        query: &PublishedPostQuery,
    ) -> Result<NumberedPage<PostRecord>, PostReadError> {
        let count = self.reader.count_published(&query.filter).await?;
        let window = query.page.window(PAGE_SIZE);

        let results = if window.offset >= count {
            Vec::new()
        } else {
            self.reader
                .list_published(&query.filter, &query.ordering, window)
                .await?
        };

        Ok(NumberedPage::new(count, query.page, PAGE_SIZE, results))
    }

    /// A published post by slug. Drafts, archived posts and unknown slugs are
    /// all reported as not found.
    pub async fn get_published(&self, slug: &str) -> Result<PostDetail, PostReadError> {
        let AuthoredPost { post, author } = self
            .reader
            .find_published_by_slug(slug)
            .await?
            .ok_or(PostReadError::NotFound)?;

        let body = self.render_body(&post);

        Ok(PostDetail {
            author: display_name(&author),
            title: post.title,
            slug: post.slug,
            body,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }

    fn render_body(&self, post: &PostRecord) -> String {
        let request = RenderRequest::new(post.slug.as_str(), post.body_markdown.as_str());
        match self.renderer.render(&request) {
            Ok(output) => output.html,
            Err(err) => {
                warn!(
                    target = "postline::application::render",
                    slug = %post.slug,
                    error = %err,
                    "rendering failed, serving stored markdown"
                );
                post.body_markdown.clone()
            }
        }
    }
}
