//! services/publisher/src/bin/publisher.rs

use publisher_lib::{config::Config, error::ServiceError, state::AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting publisher...");

    // --- 2. Build the Stores & Restore the Session ---
    info!("Opening session record at {}", config.session_file.display());
    let state = Arc::new(AppState::build(config).await?);

    match state.identity.current_session() {
        Some(user) => info!("Restored session for {} <{}>", user.name, user.email),
        None => info!("No persisted session; starting signed out"),
    }

    // --- 3. Report What Consumers Will See ---
    let posts = state.content.list();
    let front_page = blog_core::paginate(&posts, 1, blog_core::DEFAULT_PAGE_SIZE);
    info!(
        "{} post(s) across {} page(s) of {}",
        posts.len(),
        front_page.total_pages,
        blog_core::DEFAULT_PAGE_SIZE
    );
    for post in state.content.recent(3) {
        info!("Recent: \"{}\" by {}", post.title(), post.author().name);
    }

    Ok(())
}
