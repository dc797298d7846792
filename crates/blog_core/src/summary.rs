//! crates/blog_core/src/summary.rs
//!
//! Derives the preview shown in post listings from a post body.

/// Maximum number of characters kept before the ellipsis is appended.
pub const SUMMARY_LIMIT: usize = 150;

/// Appended to summaries cut at [`SUMMARY_LIMIT`].
pub const ELLIPSIS: &str = "...";

/// Strips markdown heading markers and surrounding whitespace, then cuts the
/// result to [`SUMMARY_LIMIT`] characters.
///
/// Lengths count `char`s, so multi-byte text is never split mid-character.
pub fn summarize(body: &str) -> String {
    let stripped: String = body.chars().filter(|c| *c != '#').collect();
    let trimmed = stripped.trim();

    match trimmed.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], ELLIPSIS),
        None => trimmed.to_string(),
    }
}
