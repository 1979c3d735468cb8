//! Application services layer.

pub mod error;
pub mod pagination;
pub mod posts;
pub mod render;
pub mod repos;
pub mod seed;
