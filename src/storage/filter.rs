use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use thiserror::Error;

/// Search request could not be turned into a filter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Please provide id or score")]
    MissingPredicate,
}

/// Which equality predicates a filter carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Id,
    Score,
    IdAndScore,
}

/// A store-level filter expression plus its bound values.
///
/// Parameter values only ever appear in `values`, never in the
/// expression text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    kind: FilterKind,
    expression: String,
    values: HashMap<String, AttributeValue>,
}

impl ScanFilter {
    /// Build a filter from optional `id` and `score` parameters.
    ///
    /// Empty strings count as absent. At least one predicate is required.
    pub fn from_params(id: Option<&str>, score: Option<&str>) -> Result<Self, FilterError> {
        let id = id.filter(|v| !v.is_empty());
        let score = score.filter(|v| !v.is_empty());

        let mut values = HashMap::new();
        let (kind, expression) = match (id, score) {
            (Some(id), None) => {
                values.insert(":id".to_string(), AttributeValue::S(id.to_string()));
                (FilterKind::Id, "id = :id")
            }
            (None, Some(score)) => {
                values.insert(":score".to_string(), AttributeValue::N(score.to_string()));
                (FilterKind::Score, "score = :score")
            }
            (Some(id), Some(score)) => {
                values.insert(":id".to_string(), AttributeValue::S(id.to_string()));
                values.insert(":score".to_string(), AttributeValue::N(score.to_string()));
                (FilterKind::IdAndScore, "id = :id AND score = :score")
            }
            (None, None) => return Err(FilterError::MissingPredicate),
        };

        Ok(Self {
            kind,
            expression: expression.to_string(),
            values,
        })
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }

    /// Evaluate the equality predicates against an item in memory
    #[cfg(test)]
    pub fn matches(&self, item: &super::Item) -> bool {
        self.values.iter().all(|(placeholder, bound)| {
            let attribute = placeholder.trim_start_matches(':');
            item.get(attribute) == Some(bound)
        })
    }
}
