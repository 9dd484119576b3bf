//! Error types for the HTTP layer.

use crate::runner::RunError;
use crate::translate::TranslateError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use healthdesk_core::{AccessError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Every error a client can see. All of them render as
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Username/password did not match any stored user.
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// Authorization gate rejected the request.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The user file could not be read or is invalid.
    #[error("Credential store unavailable")]
    CredentialStore(#[from] StoreError),

    /// Script could not be started or exited non-zero.
    #[error("{message}")]
    ScriptExecution {
        message: String,
        exit_code: Option<i32>,
    },

    /// Script output was not structured data.
    #[error("{0}")]
    OutputParse(String),
}

impl ApiError {
    /// Build the client-facing error for a failed script run.
    ///
    /// With `redact` set, script stdout/stderr is kept out of the message.
    pub fn from_translate(err: TranslateError, redact: bool) -> Self {
        match &err {
            TranslateError::Execution { .. } => ApiError::ScriptExecution {
                message: if redact {
                    "Script execution failed".to_string()
                } else {
                    err.to_string()
                },
                exit_code: err.exit_code(),
            },
            TranslateError::Parse { .. } => ApiError::OutputParse(if redact {
                "Failed to parse JSON from script".to_string()
            } else {
                err.to_string()
            }),
        }
    }

    pub fn from_run(err: RunError, redact: bool) -> Self {
        ApiError::ScriptExecution {
            message: if redact {
                "Script execution failed".to_string()
            } else {
                err.to_string()
            },
            exit_code: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::Access(_) => StatusCode::FORBIDDEN,
            ApiError::CredentialStore(_)
            | ApiError::ScriptExecution { .. }
            | ApiError::OutputParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let exit_code = match &self {
            ApiError::ScriptExecution { exit_code, .. } => *exit_code,
            _ => None,
        };
        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
            exit_code,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptOutput;
    use crate::translate::translate;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::AuthenticationFailed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AccessError::MissingCredential).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(AccessError::InsufficientRole {
                required: "admin".into()
            })
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::OutputParse("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_details_are_not_exposed() {
        let err = ApiError::from(StoreError::DuplicateUser("alice".into()));
        assert_eq!(err.to_string(), "Credential store unavailable");
    }

    #[test]
    fn redaction_hides_script_text() {
        let failed = translate(ScriptOutput::failure(1, "C:\\secret\\path missing")).unwrap_err();
        let err = ApiError::from_translate(failed, true);
        assert!(!err.to_string().contains("secret"));
        assert!(matches!(err, ApiError::ScriptExecution { exit_code: Some(1), .. }));

        let garbled = translate(ScriptOutput::success("internal dump")).unwrap_err();
        let err = ApiError::from_translate(garbled, true);
        assert!(!err.to_string().contains("internal dump"));
    }

    #[test]
    fn unredacted_keeps_script_text() {
        let failed = translate(ScriptOutput::failure(1, "disk full")).unwrap_err();
        assert_eq!(ApiError::from_translate(failed, false).to_string(), "disk full");
    }
}
