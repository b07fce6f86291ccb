//! JSON column value types carried by the analyses table.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single analysis-method recommendation produced by the AI collaborator.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Recommendation {
    pub method: String,
    /// descriptive / inferential / correlation / regression
    pub category: String,
    pub reasoning: String,
    pub priority: i32,
    #[serde(default)]
    pub assumptions: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Recommendations(pub Vec<Recommendation>);

/// The outcome of running one analysis method.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct MethodResult {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<serde_json::Value>,
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_size: Option<String>,
    pub conclusion: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct MethodResults(pub Vec<MethodResult>);

/// A chart or plot generated for an analysis.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Figure {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub figure_type: String,
    pub storage_url: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Figures(pub Vec<Figure>);

/// Method names the user picked for processing.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct SelectedMethods(pub Vec<String>);
