use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a research project through its lifecycle.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
pub enum ProjectStatus {
    /// Newly created, not yet being worked on
    #[sea_orm(string_value = "draft")]
    #[default]
    Draft,
    /// Data uploaded or analyses running
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// All planned analyses finished
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Draft => write!(fmt, "draft"),
            ProjectStatus::InProgress => write!(fmt, "in_progress"),
            ProjectStatus::Completed => write!(fmt, "completed"),
        }
    }
}
