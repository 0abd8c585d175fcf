//! Identity Resolver — who is making this request.
//!
//! `CurrentUser` is an Axum extractor. When no identity resolves and anonymous
//! fallback is enabled, the request runs as the configured placeholder user and
//! a warning is logged, so demo mode never looks like a silent auth success.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::CurrentUser;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the caller's identity from request headers.
pub trait IdentityResolver: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> Option<CurrentUser>;
}

/// Trusts an upstream gateway to have authenticated the caller and set `x-user-id`.
pub struct HeaderIdentityResolver;

impl IdentityResolver for HeaderIdentityResolver {
    fn current_user(&self, headers: &HeaderMap) -> Option<CurrentUser> {
        let raw = headers.get(USER_ID_HEADER)?.to_str().ok()?;
        match raw.trim().parse::<Uuid>() {
            Ok(id) => Some(CurrentUser { id }),
            Err(_) => {
                warn!("Ignoring malformed {USER_ID_HEADER} header");
                None
            }
        }
    }
}

/// Applies the fallback policy to a resolver result.
pub fn resolve_or_fallback(
    resolved: Option<CurrentUser>,
    anonymous_fallback: bool,
    placeholder: Uuid,
) -> Result<CurrentUser, AppError> {
    match resolved {
        Some(user) => Ok(user),
        None if anonymous_fallback => {
            warn!("No user identity on request. Using placeholder user {placeholder}.");
            Ok(CurrentUser { id: placeholder })
        }
        None => Err(AppError::Unauthorized),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        resolve_or_fallback(
            state.identity.current_user(&parts.headers),
            state.config.anonymous_fallback,
            state.config.placeholder_user_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_header_resolver_reads_uuid() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        let user = HeaderIdentityResolver.current_user(&headers);
        assert_eq!(user, Some(CurrentUser { id }));
    }

    #[test]
    fn test_header_resolver_rejects_missing_and_malformed() {
        assert!(HeaderIdentityResolver.current_user(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(HeaderIdentityResolver.current_user(&headers).is_none());
    }

    #[test]
    fn test_fallback_substitutes_placeholder() {
        let placeholder = Uuid::new_v4();
        let user = resolve_or_fallback(None, true, placeholder).unwrap();
        assert_eq!(user.id, placeholder);
    }

    #[test]
    fn test_fallback_disabled_is_unauthorized() {
        let result = resolve_or_fallback(None, false, Uuid::nil());
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_resolved_identity_wins_over_placeholder() {
        let id = Uuid::new_v4();
        let user = resolve_or_fallback(Some(CurrentUser { id }), true, Uuid::nil()).unwrap();
        assert_eq!(user.id, id);
    }
}
