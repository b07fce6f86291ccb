use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::session::LoginParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{user as UserApi, users, users::Model};

use serde_json::json;

use log::*;

/// POST register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = users::Model,
    responses(
        (status = 201, description = "Successfully registered a new user", body = [users::Model]),
        (status = 400, description = "Email already registered"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(user_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register a new User with email: {}", user_model.email);

    let user = UserApi::register(app_state.db_conn_ref(), user_model).await?;

    debug!("New User: {user:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "User registered successfully",
            user,
        )),
    ))
}

/// POST log in and receive an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginParams,
    responses(
        (status = 200, description = "Successfully logged in, token included in the response body"),
        (status = 401, description = "Invalid email or password"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(params): Json<LoginParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Login with email: {}", params.email);

    let (token, user) = UserApi::login(
        app_state.db_conn_ref(),
        &app_state.config,
        &params.email,
        &params.password,
    )
    .await?;

    Ok(Json(ApiResponse::success_with_message(
        "User logged in successfully",
        json!({
            "token": token,
            "user": user,
        }),
    )))
}

/// GET the authenticated user's profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Successfully retrieved the user profile", body = [users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Profile for user: {}", identity.user_id);

    let user = UserApi::profile(app_state.db_conn_ref(), identity.user_id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Profile retrieved successfully",
        user,
    )))
}
