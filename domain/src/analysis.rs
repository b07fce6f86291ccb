//! Analysis lifecycle: AI recommendations, processing, refinement and
//! project-level summaries. Every operation is scoped through project
//! ownership before it touches an analysis row.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::{analyses::Model, research_project, research_projects};
use entity::analysis_payloads::{
    MethodResult, MethodResults, Recommendation, Recommendations, SelectedMethods,
};
use entity::analysis_status::AnalysisStatus;
use entity_api::mutate::{IntoUpdateMap, UpdateMap};
use entity_api::{analysis, upload, Id};
use log::*;
use research_ai::{prompt, Provider};
use sea_orm::{DatabaseConnection, Value};
use serde::Deserialize;

/// Generates method recommendations for a project and records them as a
/// completed first-iteration analysis.
///
/// When no upload is named the most recent dataset of the project is used
/// for context; a project without uploads still gets recommendations.
pub async fn recommend(
    db: &DatabaseConnection,
    ai: &dyn Provider,
    user_id: Id,
    project_id: Id,
    upload_id: Option<Id>,
) -> Result<Model, Error> {
    let project = research_project::find_by_id_for_user(db, project_id, user_id).await?;

    let upload_model = match upload_id {
        Some(id) => Some(upload::find_by_id(db, id).await?),
        None => upload::find_latest_by_project(db, project_id).await?,
    };
    let file_name = upload_model
        .as_ref()
        .map(|u| u.file_name.as_str())
        .unwrap_or_default();

    let context = format!(
        "Project: {}\nDescription: {}\nUpload Data: {}",
        project.title, project.description, file_name
    );

    let raw_recommendations = ai.generate(&prompt::recommendations(&context)).await?;

    let recommendations = parse_recommendations(&raw_recommendations).unwrap_or_else(|| {
        warn!("Could not parse recommendations payload, falling back to default");
        fallback_recommendations()
    });

    let analysis_model = Model {
        upload_id: upload_model.map(|u| u.id),
        iteration: 1,
        status: AnalysisStatus::Completed,
        recommendations: Recommendations(recommendations),
        selected_methods: SelectedMethods(vec!["AI_Recommendation".to_string()]),
        summary: Some(raw_recommendations),
        ..empty_model(project_id)
    };

    Ok(analysis::create(db, analysis_model, project_id).await?)
}

/// Runs the recorded analysis and stores results, interpretation and
/// summary. A failed interpretation call does not fail the run.
pub async fn process(
    db: &DatabaseConnection,
    ai: &dyn Provider,
    user_id: Id,
    id: Id,
) -> Result<Model, Error> {
    let (analysis_model, project) = find_with_project(db, id, user_id).await?;

    let mut processing = UpdateMap::new();
    processing.insert("status".to_string(), status_value(AnalysisStatus::Processing));
    analysis::update(db, id, processing).await?;

    let file_name = match analysis_model.upload_id {
        Some(upload_id) => upload::find_by_id(db, upload_id)
            .await
            .map(|u| u.file_name)
            .unwrap_or_default(),
        None => String::new(),
    };

    let interpretation = match ai
        .generate(&prompt::interpretation("Analysis", "Processing completed"))
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!("Interpretation generation failed: {:?}", err);
            "Analysis completed but interpretation failed".to_string()
        }
    };

    let method_result = MethodResult {
        method: "Processed Analysis".to_string(),
        raw_output: Some(serde_json::json!({
            "status": "completed",
            "interpretation": interpretation,
        })),
        interpretation,
        effect_size: None,
        conclusion: "Analysis processed successfully".to_string(),
    };

    let mut completed = UpdateMap::new();
    completed.insert(
        "results".to_string(),
        Some(json_value(&MethodResults(vec![method_result]))?),
    );
    completed.insert(
        "summary".to_string(),
        string_value(format!(
            "Analysis completed for project: {}\nFile: {}",
            project.title, file_name
        )),
    );
    completed.insert("status".to_string(), status_value(AnalysisStatus::Completed));
    completed.insert(
        "completed_at".to_string(),
        Some(Value::ChronoDateTimeWithTimeZone(Some(Box::new(
            chrono::Utc::now().into(),
        )))),
    );

    Ok(analysis::update(db, id, completed).await?)
}

/// Loads a single analysis, verifying the requesting user owns its project.
pub async fn find_for_user(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<Model, Error> {
    let (analysis_model, _) = find_with_project(db, id, user_id).await?;
    Ok(analysis_model)
}

/// All analyses of a project, oldest first.
pub async fn find_by_project_for_user(
    db: &DatabaseConnection,
    project_id: Id,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    research_project::find_by_id_for_user(db, project_id, user_id).await?;
    Ok(analysis::find_by_project(db, project_id).await?)
}

pub async fn update_for_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    find_with_project(db, id, user_id).await?;
    Ok(analysis::update(db, id, params.into_update_map()).await?)
}

/// Soft delete. The row stays behind with a deleted status so support can
/// recover it.
pub async fn delete_for_user(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<(), Error> {
    find_with_project(db, id, user_id).await?;

    let mut update_map = UpdateMap::new();
    update_map.insert("status".to_string(), status_value(AnalysisStatus::Deleted));
    update_map.insert(
        "error_message".to_string(),
        string_value("Deleted by user".to_string()),
    );

    analysis::update(db, id, update_map).await?;
    Ok(())
}

/// Produces a refined version of an existing analysis as a new iteration.
pub async fn refine(
    db: &DatabaseConnection,
    ai: &dyn Provider,
    user_id: Id,
    id: Id,
    instructions: &str,
) -> Result<Model, Error> {
    let (original, _) = find_with_project(db, id, user_id).await?;

    let refined = ai
        .generate(&prompt::refinement(
            instructions,
            original.summary.as_deref().unwrap_or_default(),
        ))
        .await?;

    let refined_model = Model {
        upload_id: original.upload_id,
        iteration: original.iteration + 1,
        status: AnalysisStatus::Completed,
        summary: Some(refined),
        user_feedback: Some(format!("Refined version: {}", instructions)),
        ..empty_model(original.project_id)
    };

    Ok(analysis::create(db, refined_model, original.project_id).await?)
}

/// Summarizes all completed analyses of a project into a new analysis row.
pub async fn summarize_project(
    db: &DatabaseConnection,
    ai: &dyn Provider,
    user_id: Id,
    project_id: Id,
) -> Result<Model, Error> {
    let project = research_project::find_by_id_for_user(db, project_id, user_id).await?;

    let completed: Vec<Model> = analysis::find_by_project(db, project_id)
        .await?
        .into_iter()
        .filter(|a| a.status == AnalysisStatus::Completed)
        .collect();

    if completed.is_empty() {
        debug!("Project {} has no completed analyses to summarize", project_id);
        return Err(Error::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )));
    }

    let mut context = format!(
        "Project: {}\nDescription: {}\n\nAnalyses Summary:\n",
        project.title, project.description
    );
    for analysis_model in &completed {
        context.push_str(&format!(
            "- Method: Analysis {}, Status: {}, Created: {}\nResults: {}\n\n",
            analysis_model.iteration,
            analysis_model.status,
            analysis_model.created_at.format("%Y-%m-%d %H:%M:%S"),
            analysis_model.summary.as_deref().unwrap_or_default()
        ));
    }

    let summary = ai.generate(&prompt::research_summary(&context)).await?;

    let summary_model = Model {
        iteration: completed.len() as i32 + 1,
        status: AnalysisStatus::Completed,
        summary: Some(summary),
        user_feedback: Some(format!(
            "Auto-generated summary from {} analyses",
            completed.len()
        )),
        ..empty_model(project_id)
    };

    Ok(analysis::create(db, summary_model, project_id).await?)
}

/// Loads an analysis together with its project and checks ownership.
/// Unlike project routes, foreign analyses read as forbidden.
pub(crate) async fn find_with_project(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<(Model, research_projects::Model), Error> {
    let analysis_model = analysis::find_by_id(db, id).await?;
    let project =
        entity_api::research_project::find_by_id(db, analysis_model.project_id).await?;
    if project.user_id != user_id {
        debug!("Analysis {} belongs to a project owned by another user", id);
        return Err(Error::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Forbidden),
        )));
    }

    Ok((analysis_model, project))
}

#[derive(Debug, Deserialize)]
struct RecommendationsPayload {
    recommendations: Vec<Recommendation>,
}

/// Pulls the JSON object out of the model's reply, which usually wraps it
/// in prose or a code fence.
fn parse_recommendations(text: &str) -> Option<Vec<Recommendation>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    let payload: RecommendationsPayload = serde_json::from_str(text.get(start..=end)?).ok()?;

    (!payload.recommendations.is_empty()).then_some(payload.recommendations)
}

fn fallback_recommendations() -> Vec<Recommendation> {
    vec![Recommendation {
        method: "Descriptive Statistics".to_string(),
        category: "descriptive".to_string(),
        reasoning: "Basic statistical analysis of data".to_string(),
        priority: 1,
        assumptions: "Data should be normally distributed".to_string(),
    }]
}

fn empty_model(project_id: Id) -> Model {
    let now = chrono::Utc::now();
    Model {
        id: Id::nil(),
        project_id,
        upload_id: None,
        iteration: 1,
        status: AnalysisStatus::Pending,
        recommendations: Recommendations::default(),
        selected_methods: SelectedMethods::default(),
        results: MethodResults::default(),
        figures: Default::default(),
        summary: None,
        user_feedback: None,
        error_message: None,
        created_at: now.into(),
        completed_at: None,
        updated_at: now.into(),
    }
}

fn status_value(status: AnalysisStatus) -> Option<Value> {
    Some(Value::String(Some(Box::new(status.to_string()))))
}

fn string_value(value: String) -> Option<Value> {
    Some(Value::String(Some(Box::new(value))))
}

fn json_value<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    let json = serde_json::to_value(value).map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Failed to serialize analysis results".to_string(),
        )),
    })?;

    Ok(Value::Json(Some(Box::new(json))))
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use research_ai::provider::MockProvider;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn project_model(user_id: Id) -> research_projects::Model {
        let now = chrono::Utc::now();
        research_projects::Model {
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

    fn completed_analysis(project_id: Id) -> Model {
        Model {
            id: Id::new_v4(),
            status: AnalysisStatus::Completed,
            summary: Some("Means differ between groups".to_string()),
            ..empty_model(project_id)
        }
    }

    #[test]
    fn parse_recommendations_reads_a_fenced_json_payload() {
        let text = "Here you go:\n```json\n{\"recommendations\": [{\"method\": \"Mann-Whitney U\", \"category\": \"inferential\", \"reasoning\": \"Ordinal outcome\", \"priority\": 1, \"assumptions\": \"Independent samples\"}]}\n```";

        let parsed = parse_recommendations(text).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].method, "Mann-Whitney U");
    }

    #[test]
    fn parse_recommendations_rejects_prose() {
        assert!(parse_recommendations("I recommend a t-test.").is_none());
    }

    #[tokio::test]
    async fn recommend_stores_the_parsed_recommendations() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let project = project_model(user_id);

        let stored = Model {
            recommendations: Recommendations(vec![Recommendation {
                method: "Mann-Whitney U".to_string(),
                category: "inferential".to_string(),
                reasoning: "Ordinal outcome".to_string(),
                priority: 1,
                assumptions: String::new(),
            }]),
            ..completed_analysis(project.id)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .append_query_results(vec![Vec::<entity::uploads::Model>::new()])
            .append_query_results(vec![vec![stored.clone()]])
            .into_connection();

        let mut ai = MockProvider::new();
        ai.expect_generate().returning(|_| {
            Ok(r#"{"recommendations": [{"method": "Mann-Whitney U", "category": "inferential", "reasoning": "Ordinal outcome", "priority": 1}]}"#.to_string())
        });

        let created = recommend(&db, &ai, user_id, project.id, None).await?;

        assert_eq!(created.recommendations.0[0].method, "Mann-Whitney U");

        Ok(())
    }

    #[tokio::test]
    async fn recommend_hides_a_foreign_project() {
        let project = project_model(Id::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .into_connection();

        let ai = MockProvider::new();
        let result = recommend(&db, &ai, Id::new_v4(), project.id, None).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn process_rejects_a_foreign_analysis_as_forbidden() {
        let project = project_model(Id::new_v4());
        let analysis_model = completed_analysis(project.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![analysis_model.clone()]])
            .append_query_results(vec![vec![project.clone()]])
            .into_connection();

        let ai = MockProvider::new();
        let result = process(&db, &ai, Id::new_v4(), analysis_model.id).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Forbidden))
        );
    }

    #[tokio::test]
    async fn refine_builds_the_next_iteration_from_the_original_summary() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let project = project_model(user_id);
        let original = completed_analysis(project.id);
        let refined = Model {
            iteration: 2,
            summary: Some("Refined interpretation".to_string()),
            ..completed_analysis(project.id)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![original.clone()]])
            .append_query_results(vec![vec![project.clone()]])
            .append_query_results(vec![vec![refined.clone()]])
            .into_connection();

        let mut ai = MockProvider::new();
        ai.expect_generate()
            .withf(|prompt| {
                prompt.contains("Instructions: use plain language")
                    && prompt.contains("Means differ between groups")
            })
            .returning(|_| Ok("Refined interpretation".to_string()));

        let created = refine(&db, &ai, user_id, original.id, "use plain language").await?;

        assert_eq!(created.iteration, 2);

        Ok(())
    }

    #[tokio::test]
    async fn summarize_project_requires_a_completed_analysis() {
        let user_id = Id::new_v4();
        let project = project_model(user_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let ai = MockProvider::new();
        let result = summarize_project(&db, &ai, user_id, project.id).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
        );
    }

    #[tokio::test]
    async fn summarize_project_skips_incomplete_iterations() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let project = project_model(user_id);
        let pending = Model {
            status: AnalysisStatus::Pending,
            ..empty_model(project.id)
        };
        let done = completed_analysis(project.id);
        let stored = Model {
            iteration: 2,
            ..completed_analysis(project.id)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![project.clone()]])
            .append_query_results(vec![vec![pending, done]])
            .append_query_results(vec![vec![stored.clone()]])
            .into_connection();

        let mut ai = MockProvider::new();
        ai.expect_generate()
            .withf(|prompt| prompt.contains("Analyses Summary:"))
            .returning(|_| Ok("Overall the groups differ.".to_string()));

        let created = summarize_project(&db, &ai, user_id, project.id).await?;

        assert_eq!(created.iteration, 2);

        Ok(())
    }
}
