use crate::config::StoreConfig;
use crate::storage::{CommentStore, Item, ScanFilter, StoreError, PROJECTED_FIELDS};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

/// DynamoDB-backed comment table
#[derive(Debug, Clone)]
pub struct DynamoCommentStore {
    client: Client,
    table_name: String,
    follow_scan_pages: bool,
}

impl DynamoCommentStore {
    pub fn new(client: Client, table_name: impl Into<String>, follow_scan_pages: bool) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            follow_scan_pages,
        }
    }

    /// Build a client from the ambient AWS environment, honouring a configured region
    pub async fn from_config(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        info!(
            table = %config.table_name,
            region = ?sdk_config.region(),
            follow_scan_pages = config.follow_scan_pages,
            "DynamoDB client ready"
        );

        Self::new(
            Client::new(&sdk_config),
            config.table_name.clone(),
            config.follow_scan_pages,
        )
    }
}

#[async_trait]
impl CommentStore for DynamoCommentStore {
    async fn describe_count(&self) -> Result<i64, StoreError> {
        let output = self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| StoreError::Describe(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .table()
            .and_then(|table| table.item_count())
            .unwrap_or_default())
    }

    async fn scan(&self, filter: Option<&ScanFilter>) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression(PROJECTED_FIELDS.join(", "))
                .set_exclusive_start_key(start_key.take());

            if let Some(filter) = filter {
                request = request
                    .filter_expression(filter.expression())
                    .set_expression_attribute_values(Some(filter.values().clone()));
            }

            let mut response = request
                .send()
                .await
                .map_err(|e| StoreError::Scan(DisplayErrorContext(&e).to_string()))?;

            let next_key = response.last_evaluated_key.take();
            let page = response.items.unwrap_or_default();
            debug!(page_items = page.len(), more = next_key.is_some(), "Scan page received");
            items.extend(page);

            match next_key {
                Some(key) if self.follow_scan_pages && !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::retry::RetryConfig;
    use aws_sdk_dynamodb::config::Credentials;
    use aws_sdk_dynamodb::operation::describe_table::DescribeTableOutput;
    use aws_sdk_dynamodb::operation::scan::ScanOutput;
    use aws_sdk_dynamodb::types::{AttributeValue, TableDescription};
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    const TABLE: &str = "comments-test";

    fn comment(id: &str) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::S(id.to_string()));
        item
    }

    fn ids(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| item.get("id").and_then(|v| v.as_s().ok()).cloned())
            .collect()
    }

    #[tokio::test]
    async fn test_from_config_keeps_table_name() {
        let config = StoreConfig {
            table_name: TABLE.to_string(),
            region: Some("us-east-1".to_string()),
            follow_scan_pages: false,
        };

        let store = DynamoCommentStore::from_config(&config).await;

        assert_eq!(store.table_name, TABLE);
        assert!(!store.follow_scan_pages);
    }

    #[tokio::test]
    async fn test_scan_follows_pages_until_key_is_gone() {
        let first = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_none())
            .then_output(|| {
                ScanOutput::builder()
                    .items(comment("a"))
                    .items(comment("b"))
                    .last_evaluated_key("id", AttributeValue::S("b".to_string()))
                    .build()
            });
        let second = mock!(Client::scan)
            .match_requests(|req| {
                req.exclusive_start_key()
                    .and_then(|key| key.get("id"))
                    .is_some_and(|v| v == &AttributeValue::S("b".to_string()))
            })
            .then_output(|| ScanOutput::builder().items(comment("c")).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&first, &second]);

        let store = DynamoCommentStore::new(client, TABLE, true);
        let items = store.scan(None).await.unwrap();

        assert_eq!(ids(&items), vec!["a", "b", "c"]);
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_stops_on_empty_key() {
        let only = mock!(Client::scan).then_output(|| {
            ScanOutput::builder()
                .items(comment("a"))
                .set_last_evaluated_key(Some(Item::new()))
                .build()
        });
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&only]);

        let store = DynamoCommentStore::new(client, TABLE, true);
        let items = store.scan(None).await.unwrap();

        assert_eq!(ids(&items), vec!["a"]);
        assert_eq!(only.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_single_page_when_not_following() {
        let first = mock!(Client::scan).then_output(|| {
            ScanOutput::builder()
                .items(comment("a"))
                .last_evaluated_key("id", AttributeValue::S("a".to_string()))
                .build()
        });
        let second = mock!(Client::scan)
            .then_output(|| ScanOutput::builder().items(comment("b")).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&first, &second]);

        let store = DynamoCommentStore::new(client, TABLE, false);
        let items = store.scan(None).await.unwrap();

        assert_eq!(ids(&items), vec!["a"]);
        assert_eq!(first.num_calls(), 1);
        assert_eq!(second.num_calls(), 0);
    }

    #[tokio::test]
    async fn test_scan_sends_projection_filter_and_bound_values() {
        let filter = ScanFilter::from_params(Some("abc"), Some("5")).unwrap();
        let expected_values = filter.values().clone();

        let rule = mock!(Client::scan)
            .match_requests(move |req| {
                req.table_name() == Some(TABLE)
                    && req.projection_expression() == Some("id, author, body, score")
                    && req.filter_expression() == Some("id = :id AND score = :score")
                    && req.expression_attribute_values() == Some(&expected_values)
            })
            .then_output(|| ScanOutput::builder().items(comment("abc")).build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);

        let store = DynamoCommentStore::new(client, TABLE, true);
        let items = store.scan(Some(&filter)).await.unwrap();

        assert_eq!(ids(&items), vec!["abc"]);
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_unfiltered_scan_sends_no_filter() {
        let rule = mock!(Client::scan)
            .match_requests(|req| {
                req.filter_expression().is_none() && req.expression_attribute_values().is_none()
            })
            .then_output(|| ScanOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);

        let store = DynamoCommentStore::new(client, TABLE, true);

        assert!(store.scan(None).await.unwrap().is_empty());
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_describe_count_reads_item_count() {
        let rule = mock!(Client::describe_table)
            .match_requests(|req| req.table_name() == Some(TABLE))
            .then_output(|| {
                DescribeTableOutput::builder()
                    .table(TableDescription::builder().item_count(42).build())
                    .build()
            });
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);

        let store = DynamoCommentStore::new(client, TABLE, true);

        assert_eq!(store.describe_count().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_describe_count_without_count_is_zero() {
        let rule = mock!(Client::describe_table)
            .then_output(|| DescribeTableOutput::builder().build());
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, [&rule]);

        let store = DynamoCommentStore::new(client, TABLE, true);

        assert_eq!(store.describe_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connection_failure_keeps_error_detail() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url("http://127.0.0.1:1")
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .retry_config(RetryConfig::disabled())
            .build();
        let store = DynamoCommentStore::new(Client::from_conf(config), TABLE, true);

        let err = store.scan(None).await.unwrap_err();

        let StoreError::Scan(detail) = err else {
            panic!("expected scan error, got {err:?}");
        };
        assert_ne!(detail, "unhandled error");
        assert!(detail.contains("dispatch failure"), "detail was {detail:?}");
    }
}
