use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::research_project::IndexParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{research_project as ResearchProjectApi, research_projects, research_projects::Model, Id};

use log::*;

/// GET all research projects owned by the authenticated user
#[utoipa::path(
    get,
    path = "/projects",
    params(
        ("status" = Option<String>, Query, description = "Filter by project status")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all the user's research projects", body = [research_projects::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Research Projects for user: {}", identity.user_id);

    let projects =
        ResearchProjectApi::find_by_user(app_state.db_conn_ref(), identity.user_id, params).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Projects retrieved successfully",
        projects,
    )))
}

/// GET a particular research project specified by its id
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Research project id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific research project by its id", body = [research_projects::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 405, description = "Method not allowed")
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
    debug!("GET Research Project by id: {id}");

    let project =
        ResearchProjectApi::find_by_id_for_user(app_state.db_conn_ref(), id, identity.user_id)
            .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Project retrieved successfully",
        project,
    )))
}

/// POST create a new research project
#[utoipa::path(
    post,
    path = "/projects",
    request_body = research_projects::Model,
    responses(
        (status = 201, description = "Successfully created a new research project", body = [research_projects::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(project_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Research Project from: {project_model:?}");

    let project =
        ResearchProjectApi::create(app_state.db_conn_ref(), project_model, identity.user_id)
            .await?;

    debug!("New Research Project: {project:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Project created successfully",
            project,
        )),
    ))
}

/// PUT update an existing research project
#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Id of the research project to update"),
    ),
    request_body = research_projects::Model,
    responses(
        (status = 200, description = "Successfully updated the research project", body = [research_projects::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(project_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Research Project with id: {id}");

    let project = ResearchProjectApi::update_for_user(
        app_state.db_conn_ref(),
        id,
        identity.user_id,
        project_model,
    )
    .await?;

    debug!("Updated Research Project: {project:?}");

    Ok(Json(ApiResponse::success_with_message(
        "Project updated successfully",
        project,
    )))
}

/// DELETE a research project and everything attached to it
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Id of the research project to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted the research project"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 405, description = "Method not allowed")
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
    debug!("DELETE Research Project with id: {id}");

    ResearchProjectApi::delete_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Project deleted successfully",
        serde_json::json!({ "project_id": id }),
    )))
}
