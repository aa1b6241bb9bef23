//! Channel dispatcher — strictly sequential delivery of one channel's queue.

use std::time::Duration;

use feedwarden_common::types::{Article, Category};

use crate::message::build_message;
use crate::retry::{Courier, DeliveryError};
use crate::transport::{Destination, Transport};

/// Aggregate result of one channel's dispatch run.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub category: Category,
    pub attempted: usize,
    pub succeeded: usize,
    /// First terminal failure, if the queue was aborted.
    pub failure: Option<DeliveryFailure>,
}

/// A terminal failure together with the item it hit.
#[derive(Debug)]
pub struct DeliveryFailure {
    pub title: String,
    pub error: DeliveryError,
}

/// Deliver `articles` to `destination` in input order.
///
/// A fixed pacing gap is slept between messages to stay under burst limits
/// even before any rate-limit signal is seen. A terminal failure aborts the
/// remaining queue: it is taken as evidence the destination is unusable for
/// this run, and the failure is recorded in the outcome instead of being
/// silently dropped.
pub async fn dispatch_channel<T: Transport>(
    courier: &Courier<T>,
    destination: &Destination,
    category: Category,
    articles: &[Article],
) -> ChannelOutcome {
    let mut outcome = ChannelOutcome {
        category,
        attempted: 0,
        succeeded: 0,
        failure: None,
    };

    if articles.is_empty() {
        return outcome;
    }

    let pacing = Duration::from_millis(courier.config().pacing_ms);

    for (index, article) in articles.iter().enumerate() {
        let content = build_message(article, courier.config());
        outcome.attempted += 1;

        match courier.deliver(destination, &content).await {
            Ok(()) => {
                outcome.succeeded += 1;
                tracing::debug!(category = %category, title = %article.title, "Message delivered");

                // pacing gap before the next message; none after the last
                if index + 1 < articles.len() {
                    tokio::time::sleep(pacing).await;
                }
            }
            Err(error) => {
                tracing::error!(
                    category = %category,
                    title = %article.title,
                    error = %error,
                    "Delivery failed, aborting this channel's remaining queue"
                );
                outcome.failure = Some(DeliveryFailure {
                    title: article.title.clone(),
                    error,
                });
                break;
            }
        }
    }

    tracing::info!(
        category = %category,
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        "Channel dispatch finished"
    );
    outcome
}
