use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Fleet service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum FleetServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("vehicle not found")]
    VehicleNotFound,
    #[error("submission not found")]
    SubmissionNotFound,
    #[error("report not found")]
    ReportNotFound,
    /// Covers absent, already-consumed, and expired codes alike so callers
    /// cannot probe which case occurred.
    #[error("invalid or expired code")]
    InvalidOtp,
    #[error("invalid pairing token")]
    InvalidPairToken,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("unique code already in use")]
    DuplicateCode,
    #[error("referenced entity does not exist")]
    InvalidReference,
    #[error("record is in a terminal state")]
    TerminalState,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    /// Status column and audit log diverged. A programming error, never a
    /// recoverable runtime condition — surface loudly, do not repair.
    #[error("integrity fault: {0}")]
    Integrity(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FleetServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::VehicleNotFound => "VEHICLE_NOT_FOUND",
            Self::SubmissionNotFound => "SUBMISSION_NOT_FOUND",
            Self::ReportNotFound => "REPORT_NOT_FOUND",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidPairToken => "INVALID_PAIR_TOKEN",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::DuplicateCode => "DUPLICATE_CODE",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::TerminalState => "TERMINAL_STATE",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Integrity(_) => "INTEGRITY_FAULT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for FleetServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::VehicleNotFound
            | Self::SubmissionNotFound
            | Self::ReportNotFound => StatusCode::NOT_FOUND,
            Self::InvalidOtp
            | Self::InvalidPairToken
            | Self::InvalidToken
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential | Self::InvalidReference | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateCode | Self::TerminalState => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Integrity(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            Self::Integrity(detail) => {
                tracing::error!(detail = %detail, kind = "INTEGRITY_FAULT", "integrity fault");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
