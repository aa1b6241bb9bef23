//! Analyzer binary: normalizes the classification model's raw output into
//! the analyzed-articles file the notifier consumes.

use feedwarden_analyzer::normalize::normalize;
use feedwarden_common::config::AppConfig;
use feedwarden_common::github;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedwarden_analyzer=info".into()),
        )
        .init();

    tracing::info!("Feedwarden analyzer starting...");

    let config = AppConfig::from_env()?;

    let raw = config.gemini_json.as_deref().unwrap_or("").trim().to_string();
    if raw.is_empty() {
        anyhow::bail!("GEMINI_JSON environment variable is empty");
    }

    let preview: String = raw.chars().take(300).collect();
    tracing::debug!(preview = %preview, "Raw classifier output");

    let batch = normalize(&raw);

    std::fs::write(
        &config.analyzed_articles_file,
        serde_json::to_string_pretty(&batch)?,
    )?;
    tracing::info!(
        total = batch.metadata.total_count,
        ai_related = batch.metadata.ai_related_count,
        other = batch.metadata.other_count,
        file = %config.analyzed_articles_file,
        "Analyzed articles saved"
    );

    github::set_output("analyzed-count", &batch.metadata.total_count.to_string())?;

    Ok(())
}
