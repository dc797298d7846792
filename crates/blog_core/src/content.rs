//! crates/blog_core/src/content.rs
//!
//! The content store: owns every post and decides who may change it.
//!
//! The collection is kept newest-first. Mutating calls check, in order,
//! that there is a signed-in user, that the post exists, and that the user
//! wrote it; nothing is written until every check has passed.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::{StoreError, StoreResult};
use crate::ports::{BackendLink, Clock};
use crate::sync::{lock, BusyFlag};

/// Owner of post records and the ownership rules for changing them.
///
/// Like the identity store, the busy flag is advisory only: concurrent
/// mutations are not queued and may interleave at their backend await.
pub struct ContentStore {
    link: Arc<dyn BackendLink>,
    clock: Arc<dyn Clock>,
    posts: Mutex<Vec<Post>>,
    busy: BusyFlag,
}

impl ContentStore {
    pub fn new(link: Arc<dyn BackendLink>, clock: Arc<dyn Clock>) -> Self {
        Self::with_posts(link, clock, Vec::new())
    }

    /// Starts from an existing collection, which must already be newest-first.
    pub fn with_posts(link: Arc<dyn BackendLink>, clock: Arc<dyn Clock>, posts: Vec<Post>) -> Self {
        Self {
            link,
            clock,
            posts: Mutex::new(posts),
            busy: BusyFlag::default(),
        }
    }

    /// Publishes a new post at the front of the collection.
    pub async fn create(&self, author: Option<&User>, title: &str, body: &str) -> StoreResult<Post> {
        let author = author.ok_or(StoreError::Unauthenticated)?;
        let _busy = self.busy.raise();
        self.link.round_trip().await?;

        let post = Post::compose(author.as_author(), title, body, self.clock.now());
        lock(&self.posts).insert(0, post.clone());
        info!(post_id = %post.id(), author_id = %author.id, "Post created");
        Ok(post)
    }

    /// Replaces the title and body of a post owned by `editor`.
    pub async fn update(
        &self,
        id: Uuid,
        editor: Option<&User>,
        title: &str,
        body: &str,
    ) -> StoreResult<Post> {
        let editor = editor.ok_or(StoreError::Unauthenticated)?;
        let _busy = self.busy.raise();
        self.link.round_trip().await?;

        let mut posts = lock(&self.posts);
        let index = Self::owned_index(&posts, id, editor)?;
        let post = &mut posts[index];
        post.revise(title, body, self.clock.now());
        info!(post_id = %id, "Post updated");
        Ok(post.clone())
    }

    /// Removes a post owned by `editor`.
    pub async fn delete(&self, id: Uuid, editor: Option<&User>) -> StoreResult<()> {
        let editor = editor.ok_or(StoreError::Unauthenticated)?;
        let _busy = self.busy.raise();
        self.link.round_trip().await?;

        let mut posts = lock(&self.posts);
        let index = Self::owned_index(&posts, id, editor)?;
        posts.remove(index);
        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Public lookup; no sign-in required.
    pub fn get(&self, id: Uuid) -> Option<Post> {
        lock(&self.posts).iter().find(|post| post.id() == id).cloned()
    }

    /// Every post, newest first.
    pub fn list(&self) -> Vec<Post> {
        lock(&self.posts).clone()
    }

    /// Posts written by `author_id`, newest first.
    pub fn list_by_author(&self, author_id: Uuid) -> Vec<Post> {
        lock(&self.posts)
            .iter()
            .filter(|post| post.author().id == author_id)
            .cloned()
            .collect()
    }

    /// The `limit` newest posts.
    pub fn recent(&self, limit: usize) -> Vec<Post> {
        lock(&self.posts).iter().take(limit).cloned().collect()
    }

    /// Whether a create, update or delete is waiting on the backend.
    pub fn is_busy(&self) -> bool {
        self.busy.is_raised()
    }

    // Existence is checked before ownership, so a missing id is never Forbidden.
    fn owned_index(posts: &[Post], id: Uuid, editor: &User) -> StoreResult<usize> {
        let index = posts
            .iter()
            .position(|post| post.id() == id)
            .ok_or(StoreError::NotFound(id))?;

        if !posts[index].is_authored_by(editor) {
            warn!(post_id = %id, editor_id = %editor.id, "Refused change to another user's post");
            return Err(StoreError::Forbidden);
        }
        Ok(index)
    }
}
