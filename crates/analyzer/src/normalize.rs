//! Normalization of the classifier model's raw output.
//!
//! The model is asked for `{"articles": [...]}` but in practice returns a
//! few shapes: the bare object, or `{"response": "```json\n{…}\n```"}` with
//! the payload fenced inside a string. Both are accepted here. Individual
//! malformed entries are skipped with a warning; fully unparseable output
//! yields an empty batch so the pipeline reports zero articles rather than
//! crashing mid-run.

use chrono::Utc;

use feedwarden_common::types::{AnalyzedBatch, Article, BatchMetadata, Category};

/// Parse raw classifier output into a normalized batch with metadata.
pub fn normalize(raw: &str) -> AnalyzedBatch {
    let articles = parse_articles(raw);
    let ai_related_count = articles
        .iter()
        .filter(|a| a.category == Category::AiRelated)
        .count();
    let other_count = articles.len() - ai_related_count;

    AnalyzedBatch {
        metadata: BatchMetadata {
            total_count: articles.len(),
            ai_related_count,
            other_count,
            processed_at: Utc::now(),
            source: "gemini".to_string(),
        },
        articles,
    }
}

fn parse_articles(raw: &str) -> Vec<Article> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Classifier output is not valid JSON, treating as empty");
            return Vec::new();
        }
    };

    let value = unwrap_response(&value).unwrap_or(value);

    let entries = value
        .get("articles")
        .and_then(|a| a.as_array())
        .cloned()
        .unwrap_or_default();
    tracing::info!(count = entries.len(), "Articles found in classifier output");

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| validate_entry(index, entry))
        .collect()
}

/// Handle the `{"response": "```json\n{…}\n```"}` wrapper shape.
fn unwrap_response(value: &serde_json::Value) -> Option<serde_json::Value> {
    let response = value.get("response")?.as_str()?;
    let inner = extract_fenced_json(response).unwrap_or(response);
    serde_json::from_str(inner).ok()
}

/// Pull the payload out of a ```json fenced block, if present.
fn extract_fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json\n")? + "```json\n".len();
    let end = text[start..].find("\n```")?;
    Some(&text[start..start + end])
}

fn validate_entry(index: usize, entry: &serde_json::Value) -> Option<Article> {
    if !entry.is_object() {
        tracing::warn!(index, "Classifier entry is not an object, skipping");
        return None;
    }

    let field = |name: &str| {
        entry
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    Some(Article {
        title: field("title"),
        link: field("link"),
        pub_date: field("pubDate"),
        guid: field("guid"),
        category: Category::from_label(&field("category")),
        summary: field("summary"),
        content_snippet: field("contentSnippet"),
        analyzed_at: Utc::now(),
    })
}
