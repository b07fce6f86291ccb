use crate::controller::ApiResponse;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::jwt::TokenKeys;
use log::*;

/// Authentication middleware that returns 401 Unauthorized for requests
/// without a valid bearer token.
///
/// On success the verified `Identity` is stored in the request extensions
/// for the `AuthenticatedUser` extractor to pick up.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        Some(token) => token.to_owned(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error("Unauthorized")),
            )
                .into_response()
        }
    };

    let token_keys = match TokenKeys::from_config(&app_state.config) {
        Ok(token_keys) => token_keys,
        Err(err) => {
            error!("Token keys are not configured: {err:?}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Internal server error")),
            )
                .into_response();
        }
    };

    let identity = token_keys.verify(&token).ok();

    match identity {
        Some(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("Unauthorized")),
        )
            .into_response(),
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use clap::Parser;
    use domain::jwt::generate_hex_key_pair;
    use domain::{users, Id};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "authenticated"
    }

    fn test_app(config: Config) -> Router {
        let db = Arc::new(
            sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection(),
        );
        let app_state = AppState::new(config, &db);

        Router::new()
            .route("/test", get(test_handler))
            .route_layer(from_fn_with_state(app_state.clone(), require_auth))
            .with_state(app_state)
    }

    fn keyed_config() -> (Config, TokenKeys) {
        let (private_hex, public_hex) = generate_hex_key_pair();
        let config = Config::parse_from([
            "resana",
            "--auth-private-key",
            &private_hex,
            "--auth-public-key",
            &public_hex,
        ]);
        let token_keys = TokenKeys::from_hex(&private_hex, &public_hex, 24).unwrap();
        (config, token_keys)
    }

    fn test_user() -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "researcher@university.edu".to_string(),
            password: "hashed".to_string(),
            full_name: "Ada Lovelace".to_string(),
            institution: None,
            research_field: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_require_auth_returns_401_with_no_token() {
        let (config, _) = keyed_config();
        let app = test_app(config);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_returns_401_with_a_garbage_token() {
        let (config, _) = keyed_config();
        let app = test_app(config);

        let request = Request::builder()
            .uri("/test")
            .header("authorization", "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_require_auth_allows_a_valid_token_through() {
        let (config, token_keys) = keyed_config();
        let app = test_app(config);

        let token = token_keys.issue(&test_user()).unwrap();
        let request = Request::builder()
            .uri("/test")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
