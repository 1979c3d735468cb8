//! Markdown rendering for post bodies.
//!
//! The pipeline is pure: it accepts markdown, produces sanitised HTML, and
//! surfaces structured errors. Deciding what to do with a failure (such as
//! falling back to the stored markdown) is left to the caller.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{RenderError, RenderOutput, RenderRequest, RenderService};
