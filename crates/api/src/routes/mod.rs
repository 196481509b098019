//! Route handlers for the API.
//!
//! Three surfaces, matching the trust levels:
//! - `shops` - public browse/search, approved listings only
//! - `member` - registration and owner-scoped shop CRUD
//! - `admin` - moderation of shops and accounts

pub mod admin;
pub mod member;
pub mod shops;

use axum::Router;

use crate::state::AppState;

/// Build the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(shops::router())
        .merge(member::router())
        .merge(admin::router())
}
