//! Author identity helpers.

use crate::domain::entities::AuthorRecord;

/// Human-facing name for an author: `"first last"`, or the username when both
/// name parts are blank.
pub fn display_name(author: &AuthorRecord) -> String {
    let full = format!("{} {}", author.first_name.trim(), author.last_name.trim());
    let full = full.trim();
    if full.is_empty() {
        author.username.clone()
    } else {
        full.to_string()
    }
}
