use axum::http::StatusCode;

/// Handler for `GET /healthz`. The process is up; dependencies are not checked.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
