use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The variable design of a research project, stored as a JSON column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct ResearchVariables {
    #[serde(default)]
    pub independent: Vec<String>,
    #[serde(default)]
    pub dependent: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub control: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moderating: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mediating: Vec<String>,
}
