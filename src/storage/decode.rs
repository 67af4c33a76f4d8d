use crate::api::models::Comment;
use crate::storage::Item;

/// Read a string attribute. `None` when absent, null or not a string.
pub fn string_field(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

/// Read a numeric attribute as an integer.
///
/// `None` when absent, null, not a number, or not representable as `i64`.
/// A stored `0` comes back as `Some(0)`.
pub fn number_field(item: &Item, key: &str) -> Option<i64> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.trim().parse::<i64>().ok())
}

/// Decode one stored item into a comment. Never fails.
pub fn decode_comment(item: &Item) -> Comment {
    Comment {
        id: string_field(item, "id").unwrap_or_default(),
        author: string_field(item, "author").unwrap_or_default(),
        body: string_field(item, "body").unwrap_or_default(),
        score: number_field(item, "score").unwrap_or_default(),
    }
}

pub fn decode_items(items: &[Item]) -> Vec<Comment> {
    items.iter().map(decode_comment).collect()
}
