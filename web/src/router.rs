use crate::{
    controller::health_check_controller,
    middleware::{auth::require_auth, cors::apply_cors},
    params, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    analysis_controller, export_controller, research_project_controller, session_controller,
    upload_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Resana Platform API"
        ),
        paths(
            session_controller::register,
            session_controller::login,
            session_controller::profile,
            research_project_controller::index,
            research_project_controller::read,
            research_project_controller::create,
            research_project_controller::update,
            research_project_controller::delete,
            upload_controller::create,
            upload_controller::index,
            upload_controller::read,
            upload_controller::delete,
            upload_controller::preview,
            upload_controller::stats,
            analysis_controller::recommend,
            analysis_controller::process,
            analysis_controller::index,
            analysis_controller::read,
            analysis_controller::update,
            analysis_controller::delete,
            analysis_controller::refine,
            analysis_controller::summary,
            export_controller::export,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::users::Model,
                domain::research_projects::Model,
                domain::uploads::Model,
                domain::analyses::Model,
                params::session::LoginParams,
                params::analysis::RecommendParams,
                params::analysis::RefineParams,
                params::analysis::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "resana_platform", description = "Resana Research Data Analysis API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token returned from a successful login, sent as \
                             `Authorization: Bearer <token>`",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(session_routes(app_state.clone()))
        .merge(research_project_routes(app_state.clone()))
        .merge(upload_routes(app_state.clone()))
        .merge(analysis_routes(app_state.clone()))
        .merge(export_routes(app_state.clone()))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
        // CORS handling is the outermost layer so that even rejected
        // requests carry the response headers browsers require.
        .layer(from_fn_with_state(app_state, apply_cors))
}

fn session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(session_controller::register))
        .route("/auth/login", post(session_controller::login))
        .merge(
            Router::new()
                .route("/auth/profile", get(session_controller::profile))
                .route_layer(from_fn_with_state(app_state.clone(), require_auth)),
        )
        .with_state(app_state)
}

fn research_project_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/projects", get(research_project_controller::index))
        .route("/projects", post(research_project_controller::create))
        .route("/projects/:id", get(research_project_controller::read))
        .route("/projects/:id", put(research_project_controller::update))
        .route(
            "/projects/:id",
            delete(research_project_controller::delete),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn upload_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/projects/:id/uploads", post(upload_controller::create))
        .route("/uploads", get(upload_controller::index))
        .route("/uploads/:id", get(upload_controller::read))
        .route("/uploads/:id", delete(upload_controller::delete))
        .route("/uploads/:id/preview", get(upload_controller::preview))
        .route("/uploads/:id/stats", get(upload_controller::stats))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn analysis_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/projects/:id/recommendations",
            post(analysis_controller::recommend),
        )
        .route("/projects/:id/analyses", get(analysis_controller::index))
        .route("/projects/:id/summary", post(analysis_controller::summary))
        .route("/analyses/:id", get(analysis_controller::read))
        .route("/analyses/:id", put(analysis_controller::update))
        .route("/analyses/:id", delete(analysis_controller::delete))
        .route("/analyses/:id/process", post(analysis_controller::process))
        .route("/analyses/:id/refine", post(analysis_controller::refine))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn export_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/analyses/:id/export", get(export_controller::export))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
