pub mod decode;
pub mod dynamodb;
pub mod filter;

pub use decode::decode_items;
pub use dynamodb::DynamoCommentStore;
pub use filter::ScanFilter;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use thiserror::Error;

/// A raw item as returned by the backing store
pub type Item = HashMap<String, AttributeValue>;

/// Attributes requested from every scanned item
pub const PROJECTED_FIELDS: [&str; 4] = ["id", "author", "body", "score"];

/// Backing-store failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("describe table failed: {0}")]
    Describe(String),

    #[error("scan failed: {0}")]
    Scan(String),
}

/// Read-only access to the comment table
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Item count reported by the table metadata
    async fn describe_count(&self) -> Result<i64, StoreError>;

    /// Scan the table, optionally restricted by a filter
    async fn scan(&self, filter: Option<&ScanFilter>) -> Result<Vec<Item>, StoreError>;
}
