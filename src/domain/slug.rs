//! Slug derivation and validation for post URLs.
//!
//! Slugs are the public lookup key for posts. Callers either supply one
//! explicitly (validated with [`validate_slug`]) or let it be derived from the
//! title, retrying with numeric suffixes until the uniqueness predicate passes.

use std::future::Future;

use slug::slugify;
use thiserror::Error;

use crate::domain::error::DomainError;

pub const SLUG_MAX_LEN: usize = 250;
const MAX_SUFFIX_ATTEMPTS: usize = 32;
// Room left for a `-NN` suffix when truncating derived slugs.
const SUFFIX_RESERVE: usize = 4;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let mut candidate = slugify(input);
    if candidate.len() > SLUG_MAX_LEN - SUFFIX_RESERVE {
        candidate.truncate(SLUG_MAX_LEN - SUFFIX_RESERVE);
        let trimmed = candidate.trim_end_matches('-').len();
        candidate.truncate(trimmed);
    }

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that does not collide according to the supplied async predicate.
///
/// `is_unique` must resolve to `true` when the candidate is free. On collision
/// the helper retries with a monotonic counter (`-2`, `-3`, …).
pub async fn generate_unique_slug_async<F, Fut, E>(
    input: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(input)?;

    if is_unique(&base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted { base }))
}

/// Check an explicitly supplied slug: letters, digits, `-` and `_` only.
pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() {
        return Err(DomainError::validation("slug", "must not be empty"));
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(DomainError::validation(
            "slug",
            format!("must be at most {SLUG_MAX_LEN} characters"),
        ));
    }
    if !slug
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(DomainError::validation(
            "slug",
            "may only contain letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}
