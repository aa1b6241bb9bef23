//! Notification delivery binary: reads the analyzer's output file and posts
//! each article to its category's Discord webhook.

use feedwarden_common::config::AppConfig;
use feedwarden_common::types::AnalyzedBatch;
use feedwarden_notifier::retry::Courier;
use feedwarden_notifier::router::{DestinationMap, route};
use feedwarden_notifier::transport::WebhookTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedwarden_notifier=info".into()),
        )
        .init();

    tracing::info!("Feedwarden notifier starting...");

    let config = AppConfig::from_env()?;

    let raw = std::fs::read_to_string(&config.analyzed_articles_file).map_err(|e| {
        anyhow::anyhow!("cannot read {}: {}", config.analyzed_articles_file, e)
    })?;
    let batch: AnalyzedBatch = serde_json::from_str(&raw)?;
    tracing::info!(articles = batch.articles.len(), "Loaded analyzed articles");

    let destinations = DestinationMap::from_config(&config);
    let transport = WebhookTransport::new(&config.delivery);
    let courier = Courier::new(transport, config.delivery.clone());

    let outcomes = route(&courier, &batch.articles, &destinations).await;

    let mut first_failure: Option<String> = None;
    for outcome in &outcomes {
        tracing::info!(
            category = %outcome.category,
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            "Channel delivery report"
        );

        if let Some(failure) = &outcome.failure
            && first_failure.is_none()
        {
            first_failure = Some(format!(
                "delivery to {} channel failed at \"{}\": {}",
                outcome.category, failure.title, failure.error
            ));
        }
    }

    // All channels were attempted; now surface any terminal failure as a
    // non-zero exit for the CI job.
    if let Some(message) = first_failure {
        anyhow::bail!(message);
    }

    tracing::info!("All messages sent");
    Ok(())
}
