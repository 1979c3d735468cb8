use std::sync::Arc;

use crate::application::render::RenderService;
use crate::application::repos::{AuthorsRepo, PostsRepo, PostsWriteRepo};

/// Write side: validates and persists posts, owning the publication stamp.
#[derive(Clone)]
pub struct PostStore {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) authors: Arc<dyn AuthorsRepo>,
}

impl PostStore {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        authors: Arc<dyn AuthorsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            authors,
        }
    }
}

/// Read side: published-only listing and detail with rendered bodies.
#[derive(Clone)]
pub struct PostReader {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) renderer: Arc<dyn RenderService>,
}

impl PostReader {
    pub fn new(reader: Arc<dyn PostsRepo>, renderer: Arc<dyn RenderService>) -> Self {
        Self { reader, renderer }
    }
}
