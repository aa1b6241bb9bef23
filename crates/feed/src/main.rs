//! Feed polling binary: fetches the feed, filters out already-processed
//! entries, and hands the new ones to the next pipeline stage as JSON.

use std::path::Path;

use feedwarden_common::config::AppConfig;
use feedwarden_common::github;
use feedwarden_feed::cache::SeenCache;
use feedwarden_feed::poller::FeedPoller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedwarden_feed=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(url = %config.rss_url, "Feedwarden feed poller starting...");

    let poller = FeedPoller::new(config.rss_url.clone());
    let items = poller.fetch().await?;

    let cache_path = Path::new(&config.cache_file);
    let mut cache = SeenCache::load(cache_path);
    tracing::info!(cached = cache.len(), "Loaded processed-id cache");

    let new_items: Vec<_> = items
        .into_iter()
        .filter(|item| !cache.contains(&item.guid))
        .collect();
    tracing::info!(count = new_items.len(), "New articles detected");

    if !new_items.is_empty() {
        std::fs::write(
            &config.new_articles_file,
            serde_json::to_string_pretty(&new_items)?,
        )?;
        tracing::info!(
            file = %config.new_articles_file,
            count = new_items.len(),
            "Saved new articles for the analyzer stage"
        );

        for item in &new_items {
            cache.record(&item.guid);
        }
        cache.save(cache_path)?;
        tracing::info!(cached = cache.len(), "Updated processed-id cache");
    }

    github::set_output("has-new-articles", &(!new_items.is_empty()).to_string())?;
    github::set_output("new-articles-count", &new_items.len().to_string())?;

    Ok(())
}
