use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article category assigned by the upstream classification step.
///
/// The label set is closed: anything the classifier emits that is not the
/// primary label is normalized to [`Category::Other`] before it reaches the
/// delivery subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI関連")]
    AiRelated,
    #[serde(rename = "AI以外")]
    Other,
}

impl Category {
    /// All categories, in routing order.
    pub const ALL: [Category; 2] = [Category::AiRelated, Category::Other];

    /// Normalize an arbitrary classifier label into the closed set.
    pub fn from_label(label: &str) -> Self {
        if label == "AI関連" {
            Category::AiRelated
        } else {
            Category::Other
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::AiRelated => write!(f, "AI関連"),
            Category::Other => write!(f, "AI以外"),
        }
    }
}

/// A raw feed entry detected by the feed poller, before classification.
///
/// Serialized camelCase: the interchange files are consumed by the
/// classification job, whose prompt expects these exact field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_snippet: String,
    pub guid: String,
}

/// A classified article ready for notification delivery.
///
/// Immutable once produced by the analyzer; the delivery subsystem never
/// mutates or deduplicates it (dedup happens at the feed stage).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub pub_date: String,
    pub guid: String,
    pub category: Category,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content_snippet: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Aggregate counts written alongside the analyzed articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMetadata {
    pub total_count: usize,
    pub ai_related_count: usize,
    pub other_count: usize,
    pub processed_at: DateTime<Utc>,
    pub source: String,
}

/// The analyzer stage's output file: classified articles plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedBatch {
    pub articles: Vec<Article>,
    pub metadata: BatchMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_primary() {
        assert_eq!(Category::from_label("AI関連"), Category::AiRelated);
    }

    #[test]
    fn test_from_label_unknown_falls_to_other() {
        assert_eq!(Category::from_label("AI以外"), Category::Other);
        assert_eq!(Category::from_label("スポーツ"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
    }

    #[test]
    fn test_category_serde_uses_original_labels() {
        let json = serde_json::to_string(&Category::AiRelated).unwrap();
        assert_eq!(json, "\"AI関連\"");
        let back: Category = serde_json::from_str("\"AI以外\"").unwrap();
        assert_eq!(back, Category::Other);
    }
}
