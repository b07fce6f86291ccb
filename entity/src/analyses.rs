//! SeaORM Entity for the analyses table.
//! Each row is one iteration of an analysis session for a project.

use crate::analysis_payloads::{Figures, MethodResults, Recommendations, SelectedMethods};
use crate::analysis_status::AnalysisStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::analyses::Model)]
#[sea_orm(schema_name = "resana", table_name = "analyses")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[serde(skip_deserializing)]
    pub project_id: Id,

    /// Dataset the analysis ran against, if any
    #[schema(value_type = Option<Uuid>)]
    pub upload_id: Option<Id>,

    /// 1-based refinement counter within a project
    #[serde(default)]
    pub iteration: i32,

    #[serde(default)]
    pub status: AnalysisStatus,

    #[sea_orm(column_type = "JsonBinary")]
    #[serde(default)]
    pub recommendations: Recommendations,

    #[sea_orm(column_type = "JsonBinary")]
    #[serde(default)]
    pub selected_methods: SelectedMethods,

    #[sea_orm(column_type = "JsonBinary")]
    #[serde(default)]
    pub results: MethodResults,

    #[sea_orm(column_type = "JsonBinary")]
    #[serde(default)]
    pub figures: Figures,

    pub summary: Option<String>,

    pub user_feedback: Option<String>,

    /// Populated when status is failed or deleted
    pub error_message: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub completed_at: Option<DateTimeWithTimeZone>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::research_projects::Entity",
        from = "Column::ProjectId",
        to = "super::research_projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ResearchProjects,

    #[sea_orm(
        belongs_to = "super::uploads::Entity",
        from = "Column::UploadId",
        to = "super::uploads::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Uploads,
}

impl Related<super::research_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchProjects.def()
    }
}

impl Related<super::uploads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
