use super::error::{EntityApiErrorKind, Error};
use crate::query::{with_timeout, MANY_OP_TIMEOUT, SINGLE_OP_TIMEOUT};
use entity::uploads::{ActiveModel, Entity, Model, Relation};
use entity::{research_projects, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, JoinType, QueryFilter, QueryOrder,
    QuerySelect, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    upload_model: Model,
    project_id: Id,
) -> Result<Model, Error> {
    debug!("New Upload Model to be inserted: {:?}", upload_model);

    let now = chrono::Utc::now();

    let upload_active_model: ActiveModel = ActiveModel {
        project_id: Set(project_id),
        file_name: Set(upload_model.file_name),
        file_type: Set(upload_model.file_type),
        file_size: Set(upload_model.file_size),
        storage_url: Set(upload_model.storage_url),
        data_summary: Set(upload_model.data_summary),
        uploaded_at: Set(now.into()),
        ..Default::default()
    };

    let saved = with_timeout(SINGLE_OP_TIMEOUT, upload_active_model.save(db)).await?;
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

/// All uploads belonging to any project owned by the given user,
/// newest first.
pub async fn find_by_user(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    with_timeout(
        MANY_OP_TIMEOUT,
        Entity::find()
            .join(JoinType::InnerJoin, Relation::ResearchProjects.def())
            .filter(research_projects::Column::UserId.eq(user_id))
            .order_by_desc(entity::uploads::Column::UploadedAt)
            .all(db),
    )
    .await
}

/// The most recently uploaded dataset for a project, if any.
pub async fn find_latest_by_project(
    db: &DatabaseConnection,
    project_id: Id,
) -> Result<Option<Model>, Error> {
    with_timeout(
        SINGLE_OP_TIMEOUT,
        Entity::find()
            .filter(entity::uploads::Column::ProjectId.eq(project_id))
            .order_by_desc(entity::uploads::Column::UploadedAt)
            .one(db),
    )
    .await
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    with_timeout(SINGLE_OP_TIMEOUT, result.delete(db)).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::data_summary::DataSummary;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    fn upload_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            project_id: Id::new_v4(),
            file_name: "survey_responses.csv".to_owned(),
            file_type: "text/csv".to_owned(),
            file_size: 2048,
            storage_url: "https://storage.googleapis.com/resana/survey_responses.csv".to_owned(),
            data_summary: DataSummary::default(),
            uploaded_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_upload_model() -> Result<(), Error> {
        let upload_model = upload_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![upload_model.clone()]])
            .into_connection();

        let upload = create(&db, upload_model.clone(), upload_model.project_id).await?;

        assert_eq!(upload.id, upload_model.id);
        assert_eq!(upload.file_name, upload_model.file_name);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_user_joins_through_research_projects() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let user_id = Id::new_v4();
        let _ = find_by_user(&db, user_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "uploads"."id", "uploads"."project_id", "uploads"."file_name", "uploads"."file_type", "uploads"."file_size", "uploads"."storage_url", "uploads"."data_summary", "uploads"."uploaded_at" FROM "resana"."uploads" INNER JOIN "resana"."research_projects" ON "uploads"."project_id" = "research_projects"."id" WHERE "research_projects"."user_id" = $1 ORDER BY "uploads"."uploaded_at" DESC"#,
                [user_id.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_reports_not_found_for_a_missing_upload() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
