//! services/publisher/src/seed.rs
//!
//! Demo content loaded at startup when `SEED_DEMO_CONTENT` is on: one demo
//! account and two posts written by it.

use blog_core::{IdentityStore, Post, StoreResult, User};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_SECRET: &str = "password123";

/// Fixed so a demo session persisted by an earlier run still owns the demo posts.
pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0001);

const REACT_BODY: &str = "
# Getting Started with React

React is a popular JavaScript library for building user interfaces, particularly single-page applications where you need a fast, interactive user experience.

## Why React?

React offers several benefits:

1. **Component-Based Architecture**: Build encapsulated components that manage their own state, then compose them to make complex UIs.
2. **Declarative Syntax**: Design simple views for each state in your application.
3. **Learn Once, Write Anywhere**: You can develop new features in React without rewriting existing code.

## What's Next?

Once you've got your first component working, you can learn about state, events, conditional rendering, lists and forms.

Happy coding!
";

const LAYOUT_BODY: &str = "
# CSS Flexbox and Grid: A Comprehensive Guide

Modern CSS layout techniques have revolutionized the way we design web pages. Two of the most powerful tools in your CSS arsenal are Flexbox and Grid.

## Flexbox: One-dimensional Layouts

Flexbox is designed for one-dimensional layouts - either a row or a column. It's perfect for navigation bars, form controls and card layouts.

## CSS Grid: Two-dimensional Layouts

CSS Grid is designed for two-dimensional layouts with rows and columns. It's ideal for page layouts, image galleries and dashboards.

## Conclusion

By understanding when and how to use Flexbox and Grid, you can create sophisticated layouts with clean, maintainable CSS.
";

pub fn demo_user() -> User {
    User {
        id: DEMO_USER_ID,
        email: DEMO_EMAIL.to_string(),
        name: "Demo User".to_string(),
    }
}

/// Adds the demo account to `identity`.
pub fn enroll_demo_user(identity: &IdentityStore) -> StoreResult<User> {
    let user = demo_user();
    identity.import(user.clone(), DEMO_SECRET)?;
    Ok(user)
}

/// The demo posts, newest first, back-dated from `now`.
pub fn demo_posts(author: &User, now: DateTime<Utc>) -> Vec<Post> {
    vec![
        Post::compose(
            author.as_author(),
            "Getting Started with React",
            REACT_BODY,
            now - Duration::days(7),
        ),
        Post::compose(
            author.as_author(),
            "CSS Flexbox and Grid: A Comprehensive Guide",
            LAYOUT_BODY,
            now - Duration::days(14),
        ),
    ]
}
