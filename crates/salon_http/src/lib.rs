//! JSON HTTP boundary for the salon back end.
//!
//! # Responsibility
//! - Map HTTP requests onto `salon_core` services.
//! - Translate core errors into status codes and `{ "error": ... }` bodies.
//!
//! # Invariants
//! - Handlers never leak storage error details to clients.
//! - All SQLite work happens off the async executor threads.

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use routes::{
    create_organization_handler, get_department_handler, get_organization_handler,
    health_handler, list_departments_handler, list_organization_departments_handler,
    save_department_handler, sync_departments_handler,
};

/// Builds the application router over `state`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/organizations", post(create_organization_handler))
        .route("/organizations/{id}", get(get_organization_handler))
        .route(
            "/organizations/{id}/departments",
            get(list_organization_departments_handler).post(sync_departments_handler),
        )
        .route("/departments", get(list_departments_handler))
        .route(
            "/departments/{id}",
            get(get_department_handler).put(save_department_handler),
        )
        .layer(cors)
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("event=http_start module=http status=ok address={address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("event=shutdown module=http signal=ctrl_c"),
            Err(err) => {
                warn!("event=shutdown module=http status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=http signal=terminate");
            }
            Err(err) => {
                warn!("event=shutdown module=http status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
