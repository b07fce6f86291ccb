use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::analysis::{RecommendParams, RefineParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::gateway::vertex_ai::VertexAi;
use domain::{analyses, analysis as AnalysisApi, Id};

use log::*;

/// POST generate AI method recommendations for a research project
#[utoipa::path(
    post,
    path = "/projects/{id}/recommendations",
    params(
        ("id" = String, Path, description = "Id of the research project to analyze"),
    ),
    request_body = RecommendParams,
    responses(
        (status = 201, description = "Successfully generated recommendations", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 502, description = "AI provider unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn recommend(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<Id>,
    Json(params): Json<RecommendParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Generate recommendations for project: {project_id}");

    let ai = VertexAi::new(&app_state.config)?;
    let analysis = AnalysisApi::recommend(
        app_state.db_conn_ref(),
        &ai,
        identity.user_id,
        project_id,
        params.upload_id,
    )
    .await?;

    debug!("New recommendation Analysis: {analysis:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Recommendations generated successfully",
            analysis,
        )),
    ))
}

/// POST process an analysis and store its results
#[utoipa::path(
    post,
    path = "/analyses/{id}/process",
    params(
        ("id" = String, Path, description = "Id of the analysis to process"),
    ),
    responses(
        (status = 200, description = "Successfully processed the analysis", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn process(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Process Analysis with id: {id}");

    let ai = VertexAi::new(&app_state.config)?;
    let analysis =
        AnalysisApi::process(app_state.db_conn_ref(), &ai, identity.user_id, id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Analysis processed successfully",
        analysis,
    )))
}

/// GET all analyses for a research project
#[utoipa::path(
    get,
    path = "/projects/{id}/analyses",
    params(
        ("id" = String, Path, description = "Id of the research project"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the project's analyses", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Analyses for project: {project_id}");

    let analyses = AnalysisApi::find_by_project_for_user(
        app_state.db_conn_ref(),
        project_id,
        identity.user_id,
    )
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Analyses retrieved successfully",
        analyses,
    )))
}

/// GET a particular analysis specified by its id
#[utoipa::path(
    get,
    path = "/analyses/{id}",
    params(
        ("id" = String, Path, description = "Analysis id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific analysis by its id", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Analysis by id: {id}");

    let analysis =
        AnalysisApi::find_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Analysis retrieved successfully",
        analysis,
    )))
}

/// PUT update an analysis' status or notes
#[utoipa::path(
    put,
    path = "/analyses/{id}",
    params(
        ("id" = String, Path, description = "Id of the analysis to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated the analysis", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Analysis with id: {id}");

    let analysis =
        AnalysisApi::update_for_user(app_state.db_conn_ref(), id, identity.user_id, params)
            .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Analysis updated successfully",
        analysis,
    )))
}

/// DELETE (soft) an analysis
#[utoipa::path(
    delete,
    path = "/analyses/{id}",
    params(
        ("id" = String, Path, description = "Id of the analysis to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted the analysis"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Analysis with id: {id}");

    AnalysisApi::delete_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Analysis deleted successfully",
        serde_json::json!({ "analysis_id": id }),
    )))
}

/// POST refine an analysis with new instructions
#[utoipa::path(
    post,
    path = "/analyses/{id}/refine",
    params(
        ("id" = String, Path, description = "Id of the analysis to refine"),
    ),
    request_body = RefineParams,
    responses(
        (status = 201, description = "Successfully refined the analysis", body = [analyses::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found"),
        (status = 502, description = "AI provider unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refine(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RefineParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Refine Analysis with id: {id}");

    let ai = VertexAi::new(&app_state.config)?;
    let analysis = AnalysisApi::refine(
        app_state.db_conn_ref(),
        &ai,
        identity.user_id,
        id,
        &params.instructions,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Analysis refined successfully",
            analysis,
        )),
    ))
}

/// POST generate a project-level summary across completed analyses
#[utoipa::path(
    post,
    path = "/projects/{id}/summary",
    params(
        ("id" = String, Path, description = "Id of the research project to summarize"),
    ),
    responses(
        (status = 201, description = "Successfully generated a project summary", body = [analyses::Model]),
        (status = 400, description = "No completed analyses to summarize"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 502, description = "AI provider unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn summary(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Generate summary for project: {project_id}");

    let ai = VertexAi::new(&app_state.config)?;
    let analysis = AnalysisApi::summarize_project(
        app_state.db_conn_ref(),
        &ai,
        identity.user_id,
        project_id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Project summary generated successfully",
            analysis,
        )),
    ))
}
