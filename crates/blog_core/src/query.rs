//! crates/blog_core/src/query.rs
//!
//! Stateless search and pagination over a snapshot of posts, as returned by
//! `ContentStore::list`.

use crate::domain::Post;

/// Posts shown per page of a listing.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Post>,
    /// The 1-indexed page that was asked for, even when it is out of range.
    pub page: usize,
    pub total_pages: usize,
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Keeps the posts whose title, body or author name contains `term`,
/// ignoring case. Order is preserved and an empty term keeps everything.
pub fn search(posts: &[Post], term: &str) -> Vec<Post> {
    let needle = term.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            post.title().to_lowercase().contains(&needle)
                || post.body().to_lowercase().contains(&needle)
                || post.author().name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Slices out page `page` (1-indexed) of `page_size` posts.
///
/// A page outside `1..=total_pages` comes back empty rather than failing,
/// and an empty input has zero pages.
pub fn paginate(posts: &[Post], page: usize, page_size: usize) -> Page {
    if page_size == 0 {
        return Page {
            items: Vec::new(),
            page,
            total_pages: 0,
        };
    }

    let total_pages = posts.len().div_ceil(page_size);
    let items = match page.checked_sub(1) {
        Some(offset) if page <= total_pages => posts
            .iter()
            .skip(offset * page_size)
            .take(page_size)
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    Page {
        items,
        page,
        total_pages,
    }
}
