use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of an analysis through its lifecycle. `Deleted` is a soft-delete
/// marker so a user can recover an analysis record from support if needed.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "analysis_status")]
pub enum AnalysisStatus {
    /// Recorded but processing has not started
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    /// Statistical processing and interpretation underway
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Results and interpretation available
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Processing failed, see error_message
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Soft-deleted by the user
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Pending => write!(fmt, "pending"),
            AnalysisStatus::Processing => write!(fmt, "processing"),
            AnalysisStatus::Completed => write!(fmt, "completed"),
            AnalysisStatus::Failed => write!(fmt, "failed"),
            AnalysisStatus::Deleted => write!(fmt, "deleted"),
        }
    }
}
