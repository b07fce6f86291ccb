pub use self::error::{Error, Result};
pub use service::AppState;

use log::*;

mod controller;
mod error;
mod extractors;
mod middleware;
mod params;
pub mod router;

pub async fn init_server(app_state: AppState) -> Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port = app_state.config.port;

    let listen_addr = format!("{}:{}", interface, port);

    info!("Server starting... listening for connections on http://{listen_addr}");

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|err| {
            error!("Failed to bind listener: {err}");
            Error::from(domain::error::Error {
                source: Some(Box::new(err)),
                error_kind: domain::error::DomainErrorKind::Internal(
                    domain::error::InternalErrorKind::Other(
                        "Failed to bind network listener".to_string(),
                    ),
                ),
            })
        })?;

    let router = router::define_routes(app_state);

    axum::serve(listener, router).await.map_err(|err| {
        error!("Server shut down with error: {err}");
        Error::from(domain::error::Error {
            source: Some(Box::new(err)),
            error_kind: domain::error::DomainErrorKind::Internal(
                domain::error::InternalErrorKind::Other("Server failed".to_string()),
            ),
        })
    })?;

    Ok(())
}
