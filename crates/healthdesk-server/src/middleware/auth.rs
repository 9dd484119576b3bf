use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use healthdesk_core::{AccessError, AccessRule, Grant, UserStore, authorize};
use std::sync::Arc;

/// Access rule for one route, plus what is needed to evaluate it.
#[derive(Clone)]
pub struct Guard {
    pub rule: AccessRule,
    users: Arc<dyn UserStore>,
}

impl Guard {
    pub fn new(rule: AccessRule, users: Arc<dyn UserStore>) -> Self {
        Self { rule, users }
    }

    fn check(&self, header: Option<&str>) -> Result<Grant, ApiError> {
        let grant = authorize(&self.rule, header)?;

        if self.rule == AccessRule::VerifiedAuthenticated {
            let known = match grant.token.as_deref() {
                Some(token) => self.users.has_role(token)?,
                None => false,
            };
            if !known {
                return Err(AccessError::InsufficientRole {
                    required: "any known role".to_string(),
                }
                .into());
            }
        }

        Ok(grant)
    }
}

/// Axum middleware running the authorization gate before the wrapped handler.
///
/// The resulting [`Grant`] is stored in request extensions.
pub async fn enforce_access(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let grant = match guard.check(header.as_deref()) {
        Ok(grant) => grant,
        Err(err) => {
            tracing::warn!(path = %req.uri().path(), error = %err, "request rejected");
            return Err(err);
        }
    };

    req.extensions_mut().insert(grant);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthdesk_core::{StaticUserStore, UserRecord};

    fn users() -> Arc<dyn UserStore> {
        Arc::new(
            StaticUserStore::new(vec![UserRecord {
                username: "bob".into(),
                password: "pw".into(),
                role: "viewer".into(),
                name: "Bob".into(),
            }])
            .unwrap(),
        )
    }

    #[test]
    fn verified_rule_requires_known_role() {
        let guard = Guard::new(AccessRule::VerifiedAuthenticated, users());
        assert!(guard.check(Some("Bearer viewer")).is_ok());
        assert!(matches!(
            guard.check(Some("Bearer anything")),
            Err(ApiError::Access(AccessError::InsufficientRole { .. }))
        ));
        assert!(matches!(
            guard.check(Some("anything")),
            Err(ApiError::Access(AccessError::MalformedCredential))
        ));
    }

    #[test]
    fn plain_rule_does_not_touch_the_store() {
        let guard = Guard::new(AccessRule::Authenticated, users());
        assert!(guard.check(Some("Bearer anything")).is_ok());
    }
}
