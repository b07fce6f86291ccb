use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use service::config::Config;

/// CORS middleware applied as the outermost layer.
///
/// Origins on the configured allow-list are echoed back. Outside production
/// any other origin gets a wildcard so local frontends can develop against
/// the API; in production unknown origins get no CORS headers at all.
pub async fn apply_cors(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let allow_origin = resolve_origin(&app_state.config, origin.as_deref());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    if let Some(allow_origin) = allow_origin {
        if let Ok(value) = HeaderValue::from_str(&allow_origin) {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, Authorization"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static("3600"),
            );
        }
    }

    response
}

fn resolve_origin(config: &Config, origin: Option<&str>) -> Option<String> {
    let origin = origin?;

    if config.allowed_origins.iter().any(|allowed| allowed == origin) {
        Some(origin.to_string())
    } else if !config.is_production() {
        Some("*".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn listed_origins_are_echoed_back() {
        let config = Config::parse_from([
            "resana",
            "--allowed-origins",
            "https://resana.example.com,https://staging.resana.example.com",
            "--runtime-env",
            "production",
        ]);

        assert_eq!(
            resolve_origin(&config, Some("https://resana.example.com")),
            Some("https://resana.example.com".to_string())
        );
    }

    #[test]
    fn unknown_origins_get_a_wildcard_outside_production() {
        let config = Config::parse_from(["resana"]);

        assert_eq!(
            resolve_origin(&config, Some("http://localhost:3000")),
            Some("*".to_string())
        );
    }

    #[test]
    fn unknown_origins_are_refused_in_production() {
        let config = Config::parse_from(["resana", "--runtime-env", "production"]);

        assert_eq!(resolve_origin(&config, Some("https://evil.example.com")), None);
    }

    #[test]
    fn requests_without_an_origin_get_no_cors_headers() {
        let config = Config::parse_from(["resana"]);
        assert_eq!(resolve_origin(&config, None), None);
    }
}
