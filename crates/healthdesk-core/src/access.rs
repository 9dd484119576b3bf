//! Authorization gate.
//!
//! Tokens are bare role strings (see [`crate::users`]), so authorization is a
//! string comparison between the bearer token and the role an operation
//! requires.

use serde::{Deserialize, Serialize};

/// Who may call an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// Bearer token must equal this role.
    Role(String),
    /// Credential header must be present. Its content is not inspected, so
    /// `Bearer anything` passes.
    Authenticated,
    /// Credential header must parse as `<scheme> <token>`. The caller is
    /// expected to verify the returned token against known roles.
    VerifiedAuthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Authorization header is missing")]
    MissingCredential,

    #[error("Authorization header must have the form '<scheme> <token>'")]
    MalformedCredential,

    #[error("Insufficient permissions: requires role '{required}'")]
    InsufficientRole { required: String },
}

/// What the gate learned about a permitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// The bearer token, when the rule required parsing it.
    pub token: Option<String>,
}

/// Split a `"<scheme> <token>"` header value. The scheme itself is not checked.
pub fn parse_credential(header: &str) -> Result<(&str, &str), AccessError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => Ok((scheme, token)),
        _ => Err(AccessError::MalformedCredential),
    }
}

/// Run the gate for `rule` against the raw `Authorization` header value.
pub fn authorize(rule: &AccessRule, header: Option<&str>) -> Result<Grant, AccessError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(AccessError::MissingCredential)?;

    match rule {
        AccessRule::Authenticated => Ok(Grant { token: None }),
        AccessRule::VerifiedAuthenticated => {
            let (_, token) = parse_credential(header)?;
            Ok(Grant {
                token: Some(token.to_string()),
            })
        }
        AccessRule::Role(required) => {
            let (_, token) = parse_credential(header)?;
            if token != required {
                return Err(AccessError::InsufficientRole {
                    required: required.clone(),
                });
            }
            Ok(Grant {
                token: Some(token.to_string()),
            })
        }
    }
}
