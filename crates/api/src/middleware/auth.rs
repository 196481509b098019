//! Identity extractors.
//!
//! Authentication is delegated to the upstream identity provider: a trusted
//! gateway verifies the caller and forwards their subject identifier in the
//! `x-auth-subject` header. The extractors here resolve that subject to a
//! `users` row once per request, so role and account status are always
//! fresh and threaded explicitly through handler signatures - there is no
//! ambient auth state.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The trusted header carrying the identity provider's subject.
pub const AUTH_SUBJECT_HEADER: &str = "x-auth-subject";

fn subject_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTH_SUBJECT_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Extractor for the raw upstream subject, without requiring a local account.
///
/// Used by registration, which runs before the `users` row exists.
pub struct Identity(pub String);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        subject_from_parts(parts)
            .map(Self)
            .ok_or_else(|| AppError::Unauthenticated("missing identity".to_owned()))
    }
}

/// Extractor that requires a registered account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.subject)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let subject = subject_from_parts(parts)
            .ok_or_else(|| AppError::Unauthenticated("missing identity".to_owned()))?;

        let user = UserRepository::new(state.pool())
            .get_by_subject(&subject)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("account not registered".to_owned()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a registered account with the admin role.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AppError::Forbidden("admin role required".to_owned()));
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally resolves the caller's account.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests. Public
/// read paths use it so owners and admins can see their own non-approved
/// shops.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(subject) = subject_from_parts(parts) else {
            return Ok(Self(None));
        };

        let user = UserRepository::new(state.pool())
            .get_by_subject(&subject)
            .await?;

        Ok(Self(user))
    }
}
