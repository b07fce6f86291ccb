use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Structural summary of an uploaded dataset, stored as a JSON column.
///
/// Populated with a placeholder shape at upload time. Deriving the real
/// values requires parsing the dataset file, which is handled by a separate
/// profiling step that is not part of the upload path.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct DataSummary {
    #[serde(default)]
    pub rows: i64,
    #[serde(default)]
    pub columns: i64,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub column_types: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub missing_count: HashMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<serde_json::Value>,
}
