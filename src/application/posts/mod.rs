//! Post Store (create, save, status changes) and the published-post read side.

mod commands;
mod filters;
mod queries;
mod service;
pub mod types;


pub use filters::{parse_ordering, parse_timestamp};
pub use service::{PostReader, PostStore};
pub use types::{
    CreatePostCommand, PostDetail, PostQueryError, PostReadError, PostStoreError,
    PublishedPostQuery,
};
