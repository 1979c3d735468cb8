//! Parsing of listing query parameters into typed filters.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::well_known::{Iso8601, Rfc3339},
    macros::format_description,
};
use tracing::debug;

use crate::application::pagination::PageNumber;
use crate::application::repos::{OrderField, OrderTerm, PostOrdering, PublishedPostFilter};

use super::types::{PostQueryError, PublishedPostQuery};

impl PublishedPostQuery {
    /// Build a listing query from raw request parameters.
    pub fn parse(
        search: Option<&str>,
        published_after: Option<&str>,
        published_before: Option<&str>,
        ordering: Option<&str>,
        page: Option<&str>,
    ) -> Result<Self, PostQueryError> {
        let filter = PublishedPostFilter {
            search: search
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string),
            published_after: parse_optional("published_after", published_after)?,
            published_before: parse_optional("published_before", published_before)?,
        };

        Ok(Self {
            filter,
            ordering: parse_ordering(ordering),
            page: PageNumber::parse(page)?,
        })
    }
}

fn parse_optional(
    param: &'static str,
    raw: Option<&str>,
) -> Result<Option<OffsetDateTime>, PostQueryError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_timestamp(param, value).map(Some),
        None => Ok(None),
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC and
/// a bare date means midnight UTC.
pub fn parse_timestamp(param: &'static str, raw: &str) -> Result<OffsetDateTime, PostQueryError> {
    let value = raw.trim();

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    if let Ok(parsed) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Ok(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(value, &Iso8601::DEFAULT) {
        return Ok(parsed.assume_utc());
    }
    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc());
    }

    Err(PostQueryError::InvalidDate {
        param,
        value: raw.to_string(),
    })
}

/// Parse a comma-separated `ordering` value. Unsupported terms are ignored;
/// when nothing usable remains the default `-published_at` applies.
pub fn parse_ordering(raw: Option<&str>) -> PostOrdering {
    let Some(raw) = raw else {
        return PostOrdering::default();
    };

    let mut terms: Vec<OrderTerm> = Vec::new();
    for term in raw.split(',').map(str::trim).filter(|term| !term.is_empty()) {
        let (descending, name) = match term.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, term),
        };
        let field = match name {
            "published_at" => OrderField::PublishedAt,
            "created_at" => OrderField::CreatedAt,
            _ => {
                debug!(
                    target = "postline::application::posts",
                    term, "ignoring unsupported ordering term"
                );
                continue;
            }
        };
        if terms.iter().any(|existing| existing.field == field) {
            continue;
        }
        terms.push(OrderTerm { field, descending });
    }

    PostOrdering::new(terms)
}
