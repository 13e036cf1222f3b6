//! Server error logging.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::Environment;
use crate::errors::ServerErrorReport;

/// Log 5xx details attached by `AppError`, unless running in production.
pub async fn log_server_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if let Some(report) = response.extensions().get::<ServerErrorReport>() {
        if !environment.is_production() {
            tracing::error!(%method, %uri, status = %response.status(), "{}", report.0);
        }
    }

    response
}
