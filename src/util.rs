//! Small shared helpers: the search filter rule and byte formatting.

use crate::storage::Article;

/// Case-insensitive substring match against an article's title or description.
///
/// This is the single filter rule shared by the offline cache read path and
/// the keyless fixture endpoint, so both modes answer a query identically.
/// An empty query matches every article.
pub fn matches_query(article: &Article, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    article.title.to_lowercase().contains(&needle)
        || article.description.to_lowercase().contains(&needle)
}

/// Format a byte count for display (B/KB/MB/GB, 1024-based).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
