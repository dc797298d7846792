//! crates/blog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the publishing platform.
//! `User` is the shape of the durable session record; `Post` serializes
//! with camelCase field names for consumers that render it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::summary::summarize;

/// A registered account. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl User {
    /// The author snapshot embedded into posts written by this user.
    pub fn as_author(&self) -> AuthorRef {
        AuthorRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// The author of a post, captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
}

// Only used inside the identity store - contains the sealed secret
#[derive(Debug, Clone)]
pub(crate) struct Credential {
    pub user_id: Uuid,
    pub sealed_secret: String,
}

/// A published text post.
///
/// Fields are private so that `summary` can only ever be produced from
/// `body`, and `author`/`created_at` cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: Uuid,
    title: String,
    body: String,
    summary: String,
    author: AuthorRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Builds a new post with a fresh id, stamped at `now`.
    pub fn compose(author: AuthorRef, title: &str, body: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: body.to_string(),
            summary: summarize(body),
            author,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and body, keeping id, author and creation time.
    ///
    /// `updated_at` never moves before `created_at`, even if the clock does.
    pub(crate) fn revise(&mut self, title: &str, body: &str, now: DateTime<Utc>) {
        self.title = title.to_string();
        self.body = body.to_string();
        self.summary = summarize(body);
        self.updated_at = now.max(self.created_at);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn author(&self) -> &AuthorRef {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` wrote this post.
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id == user.id
    }
}
