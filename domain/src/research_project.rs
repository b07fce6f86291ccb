use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::research_projects::Model;
use entity_api::{query, research_project, research_projects, Id, IntoQueryFilterMap};
use log::*;
use sea_orm::{DatabaseConnection, Value};

pub use entity_api::research_project::create;

/// All projects owned by the given user. Additional filters from the request
/// (currently only `status`) are merged in.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Id,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let mut query_filter_map = params.into_query_filter_map();
    query_filter_map.insert(
        "user_id".to_string(),
        Some(Value::Uuid(Some(Box::new(user_id)))),
    );

    let projects = query::find_by::<research_projects::Entity, research_projects::Column>(
        db,
        query_filter_map,
    )
    .await?;

    Ok(projects)
}

/// Loads a single project, scoped to its owner. A project owned by someone
/// else is reported as not found so the endpoint does not leak which ids exist.
pub async fn find_by_id_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    let project = research_project::find_by_id(db, id).await?;
    if project.user_id != user_id {
        debug!("Project {} is not owned by the requesting user", id);
        return Err(not_found());
    }

    Ok(project)
}

pub async fn update_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
    model: Model,
) -> Result<Model, Error> {
    // Ownership check first so a foreign project reads as missing.
    find_by_id_for_user(db, id, user_id).await?;

    Ok(research_project::update(db, id, model).await?)
}

pub async fn delete_for_user(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<(), Error> {
    find_by_id_for_user(db, id, user_id).await?;

    Ok(research_project::delete_by_id(db, id).await?)
}

fn not_found() -> Error {
    Error::new(DomainErrorKind::Internal(InternalErrorKind::Entity(
        EntityErrorKind::NotFound,
    )))
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn project_model(user_id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            title: "Sleep and memory".to_string(),
            description: "Effect of sleep duration on recall".to_string(),
            research_type: "experimental".to_string(),
            hypothesis: "More sleep improves recall".to_string(),
            variables: Default::default(),
            status: Default::default(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_id_for_user_returns_an_owned_project() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let project = project_model(user_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .into_connection();

        let found = find_by_id_for_user(&db, project.id, user_id).await?;
        assert_eq!(found.id, project.id);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_for_user_hides_a_foreign_project() {
        let project = project_model(Id::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .into_connection();

        let result = find_by_id_for_user(&db, project.id, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn delete_for_user_checks_ownership_before_deleting() {
        let project = project_model(Id::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .into_connection();

        let result = delete_for_user(&db, project.id, Id::new_v4()).await;
        assert!(result.is_err());
    }
}
