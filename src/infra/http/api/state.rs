use std::sync::Arc;

use crate::application::posts::PostReader;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostReader>,
    /// Absolute origin prepended to generated links, e.g. `https://blog.example`.
    pub public_url: Option<Arc<str>>,
}

impl ApiState {
    pub fn new(posts: Arc<PostReader>, public_url: Option<&str>) -> Self {
        Self {
            posts,
            public_url: public_url
                .map(|url| url.trim_end_matches('/'))
                .filter(|url| !url.is_empty())
                .map(Arc::from),
        }
    }

    /// Prefix `path` with the public origin when one is configured.
    pub fn absolute(&self, path: &str) -> String {
        match self.public_url.as_deref() {
            Some(origin) => format!("{origin}{path}"),
            None => path.to_string(),
        }
    }
}
