//! Post lifecycle rules and field validation.

use time::OffsetDateTime;

use crate::domain::{error::DomainError, types::PostStatus};

pub const TITLE_MAX_LEN: usize = 250;

/// Compute the `published_at` value to persist for a save happening at `now`.
///
/// Every save of a published post moves the timestamp to `now`, including
/// saves of posts that were already published. Other statuses keep whatever
/// value the post carried.
pub fn stamp_publication(
    status: PostStatus,
    current: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    if status.is_published() {
        Some(now)
    } else {
        current
    }
}

pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(
            "title",
            format!("must be at most {TITLE_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_body(body: &str) -> Result<(), DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::validation("body", "must not be empty"));
    }
    Ok(())
}
