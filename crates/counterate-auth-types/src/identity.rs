//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-counterate-user-id";
pub const USER_ROLE_HEADER: &str = "x-counterate-user-role";
pub const SESSION_VERSION_HEADER: &str = "x-counterate-session-version";

/// Identity injected by the gateway after it validated the session.
///
/// Returns 401 if any header is absent or malformed. The role is carried
/// verbatim; services re-check it against their own store.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: String,
    pub session_version: i32,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = Self::from_parts(parts);
        async move { result }
    }
}

impl IdentityHeaders {
    /// Synchronous extraction, usable from other extractors.
    pub fn from_parts(parts: &Parts) -> Result<Self, StatusCode> {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());

        let user_id = header(USER_ID_HEADER)
            .and_then(|s| s.parse::<Uuid>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let user_role = header(USER_ROLE_HEADER)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let session_version = header(SESSION_VERSION_HEADER)
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self {
            user_id,
            user_role,
            session_version,
        })
    }
}
