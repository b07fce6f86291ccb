use super::error::{EntityApiErrorKind, Error};
use crate::query::{with_timeout, SINGLE_OP_TIMEOUT};
use entity::research_projects::{ActiveModel, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    project_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!(
        "New Research Project Model to be inserted: {:?}",
        project_model
    );

    let now = chrono::Utc::now();

    let project_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        title: Set(project_model.title),
        description: Set(project_model.description),
        research_type: Set(project_model.research_type),
        hypothesis: Set(project_model.hypothesis),
        variables: Set(project_model.variables),
        status: Set(project_model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let saved = with_timeout(SINGLE_OP_TIMEOUT, project_active_model.save(db)).await?;
    Ok(saved.try_into_model()?)
}

pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = with_timeout(SINGLE_OP_TIMEOUT, Entity::find_by_id(id).one(db)).await?;

    match result {
        Some(project) => {
            debug!("Existing Research Project model to be Updated: {:?}", project);

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(project.id),
                user_id: Unchanged(project.user_id),
                title: Set(model.title),
                description: Set(model.description),
                research_type: Set(model.research_type),
                hypothesis: Set(model.hypothesis),
                variables: Set(model.variables),
                status: Set(model.status),
                updated_at: Set(chrono::Utc::now().into()),
                created_at: Unchanged(project.created_at),
            };

            let updated = with_timeout(SINGLE_OP_TIMEOUT, active_model.update(db)).await?;
            Ok(updated.try_into_model()?)
        }
        None => {
            debug!("Research Project with id {} not found", id);

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    with_timeout(SINGLE_OP_TIMEOUT, result.delete(db)).await?;
    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    with_timeout(SINGLE_OP_TIMEOUT, Entity::find_by_id(id).one(db))
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::research_variables::ResearchVariables;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn project_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id: Id::new_v4(),
            title: "Sleep and memory".to_owned(),
            description: "Effect of sleep duration on recall".to_owned(),
            research_type: "experimental".to_owned(),
            hypothesis: "More sleep improves recall".to_owned(),
            variables: ResearchVariables {
                independent: vec!["sleep_hours".to_owned()],
                dependent: vec!["recall_score".to_owned()],
                ..Default::default()
            },
            status: Default::default(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_research_project_model() -> Result<(), Error> {
        let project_model = project_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project_model.clone()]])
            .into_connection();

        let project = create(&db, project_model.clone(), project_model.user_id).await?;

        assert_eq!(project.id, project_model.id);
        assert_eq!(project.title, project_model.title);

        Ok(())
    }

    #[tokio::test]
    async fn update_returns_an_updated_research_project_model() -> Result<(), Error> {
        let project_model = project_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![project_model.clone()],
                vec![project_model.clone()],
            ])
            .into_connection();

        let project = update(&db, project_model.id, project_model.clone()).await?;

        assert_eq!(project.hypothesis, project_model.hypothesis);

        Ok(())
    }

    #[tokio::test]
    async fn update_reports_not_found_for_a_missing_project() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = update(&db, Id::new_v4(), project_model()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
