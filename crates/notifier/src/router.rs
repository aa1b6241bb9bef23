//! Router — partitions classified articles into per-category queues and
//! runs the channel dispatcher for each configured destination.

use feedwarden_common::config::AppConfig;
use feedwarden_common::types::{Article, Category};

use crate::dispatcher::{ChannelOutcome, dispatch_channel};
use crate::retry::Courier;
use crate::transport::{Destination, Transport};

/// Category → destination bindings, fixed at configuration time.
///
/// Unmapped categories are a valid configuration: their articles are
/// skipped silently, not reported as failures.
#[derive(Debug, Clone, Default)]
pub struct DestinationMap {
    ai_related: Option<Destination>,
    other: Option<Destination>,
}

impl DestinationMap {
    pub fn new(ai_related: Option<Destination>, other: Option<Destination>) -> Self {
        Self { ai_related, other }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.discord_ai_webhook.clone().map(Destination::new),
            config.discord_other_webhook.clone().map(Destination::new),
        )
    }

    pub fn get(&self, category: Category) -> Option<&Destination> {
        match category {
            Category::AiRelated => self.ai_related.as_ref(),
            Category::Other => self.other.as_ref(),
        }
    }
}

/// Split articles into one ordered queue per category, preserving input
/// order within each queue. Order matters: it is the send order a reader
/// sees in the channel.
pub fn partition_by_category(articles: &[Article]) -> Vec<(Category, Vec<Article>)> {
    Category::ALL
        .iter()
        .map(|&category| {
            let queue: Vec<Article> = articles
                .iter()
                .filter(|a| a.category == category)
                .cloned()
                .collect();
            (category, queue)
        })
        .collect()
}

/// Dispatch every mapped, non-empty per-category queue, sequentially.
///
/// Channels are independent: one channel's terminal failure is recorded in
/// its outcome and the next channel still gets its full delivery attempt.
pub async fn route<T: Transport>(
    courier: &Courier<T>,
    articles: &[Article],
    destinations: &DestinationMap,
) -> Vec<ChannelOutcome> {
    let mut outcomes = Vec::new();

    for (category, queue) in partition_by_category(articles) {
        if queue.is_empty() {
            continue;
        }

        let Some(destination) = destinations.get(category) else {
            tracing::info!(
                category = %category,
                skipped = queue.len(),
                "No webhook configured for category, skipping"
            );
            continue;
        };

        outcomes.push(dispatch_channel(courier, destination, category, &queue).await);
    }

    outcomes
}
