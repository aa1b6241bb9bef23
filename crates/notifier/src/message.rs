//! Message construction — one classified article to one channel-safe text blob.

use feedwarden_common::config::DeliveryConfig;
use feedwarden_common::types::Article;

/// Marker appended when the body had to be cut.
const ELLIPSIS: char = '…';

/// Render an article as webhook message content.
///
/// Layout: bolded title header, body (summary, falling back to the raw
/// content snippet), trailing link line. The header and link are never
/// truncated; the body gets whatever character budget remains under
/// `config.max_content_length` and is cut with an ellipsis when over.
///
/// Lengths are counted in characters, not bytes: bodies are Japanese text
/// and the remote's limit is on code points.
pub fn build_message(article: &Article, config: &DeliveryConfig) -> String {
    let header = format!("**【{}】**\n\n", article.title);
    let link = format!("\n\n🔗 {}", article.link);

    let body_source = if article.summary.is_empty() {
        article.content_snippet.as_str()
    } else {
        article.summary.as_str()
    };

    let budget = config
        .max_content_length
        .saturating_sub(header.chars().count() + link.chars().count());
    let body = truncate_chars(body_source, budget);

    format!("{header}{body}{link}")
}

/// Cut `text` to at most `budget` characters, ellipsis included when cut.
fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(budget - 1).collect();
    cut.push(ELLIPSIS);
    cut
}
