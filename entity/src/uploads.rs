//! SeaORM Entity for the uploads table.
//! One row per dataset file attached to a research project.

use crate::data_summary::DataSummary;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::uploads::Model)]
#[sea_orm(schema_name = "resana", table_name = "uploads")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[serde(skip_deserializing)]
    pub project_id: Id,

    pub file_name: String,

    /// MIME type reported by the client
    pub file_type: String,

    pub file_size: i64,

    /// Object storage location of the raw file
    pub storage_url: String,

    #[sea_orm(column_type = "JsonBinary")]
    #[serde(default)]
    pub data_summary: DataSummary,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub uploaded_at: DateTimeWithTimeZone,
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

    #[sea_orm(has_many = "super::analyses::Entity")]
    Analyses,
}

impl Related<super::research_projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResearchProjects.def()
    }
}

impl Related<super::analyses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
