use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};
use domain::gateway::object_storage::GcsStore;
use domain::{upload as UploadApi, uploads, Id};

use log::*;

/// POST upload a dataset file to a research project
#[utoipa::path(
    post,
    path = "/projects/{id}/uploads",
    params(
        ("id" = String, Path, description = "Id of the research project to attach the dataset to"),
    ),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Successfully uploaded a dataset file", body = [uploads::Model]),
        (status = 400, description = "No file attached"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<Id>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Upload a dataset file to project: {project_id}");

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.dat").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(invalid_multipart)?.to_vec();
            file = Some((file_name, content_type, data));
        }
    }

    let (file_name, content_type, data) = file.ok_or_else(|| {
        debug!("Upload request without a file field");
        Error::from(DomainError::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )))
    })?;

    let store = GcsStore::new(&app_state.config)?;
    let upload = UploadApi::create(
        app_state.db_conn_ref(),
        &store,
        identity.user_id,
        project_id,
        file_name,
        content_type,
        data,
    )
    .await?;

    debug!("New Upload: {upload:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "File uploaded successfully",
            upload,
        )),
    ))
}

/// GET all uploads across the user's projects
#[utoipa::path(
    get,
    path = "/uploads",
    responses(
        (status = 200, description = "Successfully retrieved all the user's uploads", body = [uploads::Model]),
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
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Uploads for user: {}", identity.user_id);

    let uploads = UploadApi::find_by_user(app_state.db_conn_ref(), identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Uploads retrieved successfully",
        uploads,
    )))
}

/// GET a particular upload specified by its id
#[utoipa::path(
    get,
    path = "/uploads/{id}",
    params(
        ("id" = String, Path, description = "Upload id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific upload by its id", body = [uploads::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Upload not found"),
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
    debug!("GET Upload by id: {id}");

    let upload =
        UploadApi::find_by_id_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Upload retrieved successfully",
        upload,
    )))
}

/// DELETE an upload and its stored object
#[utoipa::path(
    delete,
    path = "/uploads/{id}",
    params(
        ("id" = String, Path, description = "Id of the upload to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted the upload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Upload not found"),
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
    debug!("DELETE Upload with id: {id}");

    let store = GcsStore::new(&app_state.config)?;
    UploadApi::delete_for_user(app_state.db_conn_ref(), &store, id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Upload deleted successfully",
        serde_json::json!({ "upload_id": id }),
    )))
}

/// GET a preview of the first rows of an uploaded dataset
#[utoipa::path(
    get,
    path = "/uploads/{id}/preview",
    params(
        ("id" = String, Path, description = "Upload id to preview")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a data preview"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Upload not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn preview(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Data preview for upload: {id}");

    let preview =
        UploadApi::preview_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Data preview retrieved successfully",
        preview,
    )))
}

/// GET summary statistics for an uploaded dataset
#[utoipa::path(
    get,
    path = "/uploads/{id}/stats",
    params(
        ("id" = String, Path, description = "Upload id to compute statistics for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved dataset statistics"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Upload not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn stats(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Statistics for upload: {id}");

    let stats = UploadApi::stats_for_user(app_state.db_conn_ref(), id, identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Statistics retrieved successfully",
        stats,
    )))
}

fn invalid_multipart(err: axum::extract::multipart::MultipartError) -> Error {
    debug!("Failed to read multipart body: {err:?}");
    Error::from(DomainError::new(DomainErrorKind::Internal(
        InternalErrorKind::Entity(EntityErrorKind::Invalid),
    )))
}
