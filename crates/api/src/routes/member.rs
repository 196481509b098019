//! Member handlers: registration and owner-scoped shop CRUD.
//!
//! Every mutation validates before it writes: a 4xx from these handlers
//! means no partial state reached the store.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use tracing::instrument;

use shopdex_core::ShopId;

use crate::db::ShopRepository;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{Identity, RequireAuth};
use crate::models::shop::{ShopDraft, ShopFields, ShopPatch};
use crate::models::{Shop, User};
use crate::state::AppState;

/// Build the member router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/member/register", post(register))
        .route("/member/me", get(me))
        .route("/member/shops", get(list_own_shops).post(create_shop))
        .route(
            "/member/shops/{id}",
            put(update_shop).delete(delete_shop),
        )
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// POST /member/register - create the local account for the caller's
/// upstream identity. New accounts start `member`/`pending` and must be
/// approved by an admin before they can submit shops.
#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    Identity(subject): Identity,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = UserRepository::new(state.pool())
        .register(&subject, body.display_name.as_deref(), body.email.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /member/me - the caller's own account record.
#[instrument(skip_all)]
async fn me(RequireAuth(user): RequireAuth) -> Json<User> {
    Json(user)
}

/// GET /member/shops - all of the caller's shops, any status.
#[instrument(skip_all, fields(user_id = %user.id))]
async fn list_own_shops(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Shop>>> {
    let shops = ShopRepository::new(state.pool())
        .list_by_owner(user.id)
        .await?;

    Ok(Json(shops))
}

/// POST /member/shops - submit a new listing.
///
/// Requires an approved account. The shop starts `pending` and stays
/// invisible to the public until an admin approves it.
#[instrument(skip_all, fields(user_id = %user.id))]
async fn create_shop(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(fields): Json<ShopFields>,
) -> Result<(StatusCode, Json<Shop>)> {
    if !user.may_create_shops() {
        return Err(AppError::Forbidden(
            "account must be approved before creating shops".to_owned(),
        ));
    }

    let draft = ShopDraft::from_fields(fields).map_err(|e| AppError::Validation(e.to_string()))?;

    let shop = ShopRepository::new(state.pool())
        .create(user.id, draft)
        .await?;

    tracing::info!(shop_id = %shop.id, "shop created");
    Ok((StatusCode::CREATED, Json(shop)))
}

/// Load a shop and enforce the ownership rule shared by update/delete.
///
/// Not-found wins over forbidden: a caller probing ids they don't own
/// learns nothing beyond 404 for ids that don't exist.
async fn load_owned(state: &AppState, user: &User, id: ShopId) -> Result<Shop> {
    let shop = ShopRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("shop {id}")))?;

    if shop.owner_id != user.id && !user.role.is_admin() {
        return Err(AppError::Forbidden("not the owner of this shop".to_owned()));
    }

    Ok(shop)
}

/// PUT /member/shops/{id} - partial update of an owned listing.
///
/// Status is untouched: an approved shop stays approved after an edit, and
/// re-review remains an explicit admin action.
#[instrument(skip_all, fields(user_id = %user.id, shop_id = %id))]
async fn update_shop(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShopId>,
    Json(fields): Json<ShopFields>,
) -> Result<Json<Shop>> {
    load_owned(&state, &user, id).await?;

    let patch = ShopPatch::from_fields(fields).map_err(|e| AppError::Validation(e.to_string()))?;

    let shop = ShopRepository::new(state.pool()).update(id, patch).await?;

    Ok(Json(shop))
}

/// DELETE /member/shops/{id} - hard delete of an owned listing.
#[instrument(skip_all, fields(user_id = %user.id, shop_id = %id))]
async fn delete_shop(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ShopId>,
) -> Result<StatusCode> {
    load_owned(&state, &user, id).await?;

    ShopRepository::new(state.pool()).delete(id).await?;

    tracing::info!("shop deleted");
    Ok(StatusCode::NO_CONTENT)
}
