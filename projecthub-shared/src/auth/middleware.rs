/// Authenticated-request context
///
/// The HTTP layer validates the bearer token once per request and stores an
/// `AuthContext` in the request extensions; handlers extract it instead of
/// touching tokens themselves.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::models::account::AccountRole;

/// Identity of the authenticated account for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account ID from the token's subject claim
    pub account_id: Uuid,

    /// Role tag carried in the token
    pub role: AccountRole,
}

impl AuthContext {
    /// Builds a context from validated JWT claims
    pub fn from_claims(account_id: Uuid, role: AccountRole) -> Self {
        Self { account_id, role }
    }
}

/// Error returned when a handler requires authentication that is absent
///
/// This only fires if a route forgot the auth layer; the layer itself
/// rejects unauthenticated requests before the handler runs.
#[derive(Debug, thiserror::Error)]
#[error("request is not authenticated")]
pub struct MissingAuthContext;

impl IntoResponse for MissingAuthContext {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = MissingAuthContext;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(MissingAuthContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims() {
        let account_id = Uuid::new_v4();
        let ctx = AuthContext::from_claims(account_id, AccountRole::Faculty);

        assert_eq!(ctx.account_id, account_id);
        assert_eq!(ctx.role, AccountRole::Faculty);
    }
}
