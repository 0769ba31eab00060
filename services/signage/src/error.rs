use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Signage service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum SignageServiceError {
    #[error("identity not found")]
    IdentityNotFound,
    #[error("unit not found")]
    UnitNotFound,
    #[error("rate not found")]
    RateNotFound,
    #[error("deposit not found")]
    DepositNotFound,
    #[error("username already taken")]
    UsernameTaken,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid command")]
    InvalidCommand,
    #[error("missing data")]
    MissingData,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("pairing conflict")]
    PairingConflict,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl SignageServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::UnitNotFound => "UNIT_NOT_FOUND",
            Self::RateNotFound => "RATE_NOT_FOUND",
            Self::DepositNotFound => "DEPOSIT_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidCommand => "INVALID_COMMAND",
            Self::MissingData => "MISSING_DATA",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::PairingConflict => "PAIRING_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for SignageServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::IdentityNotFound
            | Self::UnitNotFound
            | Self::RateNotFound
            | Self::DepositNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::PairingConflict => StatusCode::CONFLICT,
            Self::InvalidUsername | Self::InvalidCommand | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged here; TraceLayer records the rest.
        let message = match &self {
            Self::Internal(e) => {
                let chain = format!("{e:#}");
                tracing::error!(error = %chain, kind = "INTERNAL", "internal error");
                "internal error".to_owned()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": message,
        });
        (status, axum::Json(body)).into_response()
    }
}
