use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::export::ExportParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};
use domain::export::{self as ExportApi, ExportFormat};
use domain::Id;

use log::*;

/// GET export a completed analysis as a downloadable document
#[utoipa::path(
    get,
    path = "/analyses/{id}/export",
    params(
        ("id" = String, Path, description = "Id of the analysis to export"),
        ("format" = Option<String>, Query, description = "Export format: pdf (default), csv or json")
    ),
    responses(
        (status = 200, description = "Successfully exported the analysis"),
        (status = 400, description = "Unknown format or analysis not yet completed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Analysis not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, Error> {
    let format_name = params.format_or_default();
    debug!("GET Export Analysis {id} as {format_name}");

    let format = ExportFormat::from_query(format_name).ok_or_else(|| {
        debug!("Unknown export format requested: {format_name}");
        Error::from(DomainError::new(DomainErrorKind::Internal(
            InternalErrorKind::Entity(EntityErrorKind::Invalid),
        )))
    })?;

    let document = ExportApi::export(app_state.db_conn_ref(), identity.user_id, id, format).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(document.content_type),
    );
    if let Ok(disposition) = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.file_name
    )) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, document.body))
}
