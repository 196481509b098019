//! Admin moderation handlers.
//!
//! Admins see everything: listings and accounts in any status. Status
//! transitions are explicit actions - approve/reject only, never back to
//! `pending`, with re-review allowed in both directions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use shopdex_core::{ShopId, ShopStatus, UserId, UserStatus};

use crate::db::{ShopRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Shop, User};
use crate::state::AppState;

/// Default page size for admin listings.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/shops", get(list_shops))
        .route("/admin/shops/{id}/status", post(set_shop_status))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}/status", post(set_user_status))
}

/// Admin listing query parameters.
#[derive(Debug, Deserialize)]
pub struct AdminListQuery<S> {
    pub status: Option<S>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl<S> AdminListQuery<S> {
    fn page(&self, max_page_size: i64) -> (i64, i64) {
        let limit = self
            .limit
            .filter(|n| *n > 0)
            .map_or(DEFAULT_PAGE_SIZE, |n| n.min(max_page_size));
        let offset = self.offset.filter(|n| *n >= 0).unwrap_or(0);
        (limit, offset)
    }
}

/// GET /admin/shops - listings in any status, optionally filtered.
#[instrument(skip(state, _admin))]
async fn list_shops(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<AdminListQuery<ShopStatus>>,
) -> Result<Json<Vec<Shop>>> {
    let (limit, offset) = query.page(state.config().max_page_size);

    let shops = ShopRepository::new(state.pool())
        .list_admin(query.status, limit, offset)
        .await?;

    Ok(Json(shops))
}

/// Status transition request body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest<S> {
    pub status: S,
}

/// POST /admin/shops/{id}/status - approve or reject a listing.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn set_shop_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ShopId>,
    Json(body): Json<SetStatusRequest<ShopStatus>>,
) -> Result<Json<Shop>> {
    if !body.status.is_valid_review_target() {
        return Err(AppError::Validation(
            "status must be approved or rejected".to_owned(),
        ));
    }

    let shop = ShopRepository::new(state.pool())
        .set_status(id, body.status)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound(format!("shop {id}")),
            other => other.into(),
        })?;

    tracing::info!(shop_id = %id, status = %body.status, "shop status changed");
    Ok(Json(shop))
}

/// GET /admin/users - accounts in any status, optionally filtered.
#[instrument(skip(state, _admin))]
async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<AdminListQuery<UserStatus>>,
) -> Result<Json<Vec<User>>> {
    let (limit, offset) = query.page(state.config().max_page_size);

    let users = UserRepository::new(state.pool())
        .list(query.status, limit, offset)
        .await?;

    Ok(Json(users))
}

/// POST /admin/users/{id}/status - approve or reject a member account.
///
/// Approval is what unlocks shop creation for the member.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
async fn set_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<SetStatusRequest<UserStatus>>,
) -> Result<Json<User>> {
    if !body.status.is_valid_review_target() {
        return Err(AppError::Validation(
            "status must be approved or rejected".to_owned(),
        ));
    }

    let user = UserRepository::new(state.pool())
        .set_status(id, body.status)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound(format!("user {id}")),
            other => other.into(),
        })?;

    tracing::info!(user_id = %id, status = %body.status, "user status changed");
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let query: AdminListQuery<ShopStatus> = AdminListQuery {
            status: None,
            limit: None,
            offset: None,
        };
        assert_eq!(query.page(100), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn test_page_clamps() {
        let query: AdminListQuery<ShopStatus> = AdminListQuery {
            status: None,
            limit: Some(9999),
            offset: Some(-5),
        };
        assert_eq!(query.page(100), (100, 0));

        let query: AdminListQuery<ShopStatus> = AdminListQuery {
            status: None,
            limit: Some(20),
            offset: Some(40),
        };
        assert_eq!(query.page(100), (20, 40));
    }
}
