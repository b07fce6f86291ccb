use super::error::{EntityApiErrorKind, Error};
use crate::mutate::{self, UpdateMap};
use crate::query::{with_timeout, MANY_OP_TIMEOUT, SINGLE_OP_TIMEOUT};
use entity::analyses::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryFilter, QueryOrder,
    TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    analysis_model: Model,
    project_id: Id,
) -> Result<Model, Error> {
    debug!("New Analysis Model to be inserted: {:?}", analysis_model);

    let now = chrono::Utc::now();

    let analysis_active_model: ActiveModel = ActiveModel {
        project_id: Set(project_id),
        upload_id: Set(analysis_model.upload_id),
        iteration: Set(analysis_model.iteration),
        status: Set(analysis_model.status),
        recommendations: Set(analysis_model.recommendations),
        selected_methods: Set(analysis_model.selected_methods),
        results: Set(analysis_model.results),
        figures: Set(analysis_model.figures),
        summary: Set(analysis_model.summary),
        user_feedback: Set(analysis_model.user_feedback),
        error_message: Set(analysis_model.error_message),
        created_at: Set(now.into()),
        completed_at: Set(analysis_model.completed_at),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let saved = with_timeout(SINGLE_OP_TIMEOUT, analysis_active_model.save(db)).await?;
    Ok(saved.try_into_model()?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    with_timeout(SINGLE_OP_TIMEOUT, Entity::find_by_id(id).one(db))
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

/// All analyses for a project, oldest first so iterations read in order.
pub async fn find_by_project(db: &DatabaseConnection, project_id: Id) -> Result<Vec<Model>, Error> {
    with_timeout(
        MANY_OP_TIMEOUT,
        Entity::find()
            .filter(Column::ProjectId.eq(project_id))
            .order_by_asc(Column::CreatedAt)
            .all(db),
    )
    .await
}

/// Applies the fields present in the map to the stored record.
/// The record's `updated_at` is always refreshed.
pub async fn update(db: &DatabaseConnection, id: Id, mut update_map: UpdateMap) -> Result<Model, Error> {
    let analysis = find_by_id(db, id).await?;

    update_map.insert(
        "updated_at".to_string(),
        Some(sea_orm::Value::ChronoDateTimeWithTimeZone(Some(Box::new(
            chrono::Utc::now().into(),
        )))),
    );

    let active_model: ActiveModel = analysis.into();
    mutate::update::<ActiveModel, Column>(db, active_model, update_map).await
}
