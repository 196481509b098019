//! Public shop browse/search handlers.
//!
//! These paths never require identity and never 400 on malformed geo input:
//! a bad coordinate just degrades to the unordered (most recent first)
//! listing, per the graceful-degradation contract.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopdex_core::{GeoPoint, ShopId};

use crate::db::{ShopRepository, shops::PublicSearch};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::Shop;
use crate::state::AppState;

/// Default page size for public listings.
const DEFAULT_PAGE_SIZE: i64 = 50;
/// Upper bound on the search radius, in kilometers.
const MAX_RADIUS_KM: f64 = 500.0;

/// Build the public shops router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops))
        .route("/shops/{id}", get(get_shop))
}

/// Public listing query parameters.
///
/// Numeric fields arrive as raw strings and are parsed leniently: a value
/// that does not parse is treated as absent rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListShopsQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_km: Option<String>,
    pub search: Option<String>,
    /// Comma-separated tag list; any shared tag matches.
    pub tags: Option<String>,
    pub limit: Option<String>,
}

/// Public listing response.
#[derive(Debug, Serialize)]
pub struct ShopListResponse {
    pub shops: Vec<Shop>,
    pub count: usize,
}

/// Parse a raw query value as f64, treating junk as absent.
fn lenient_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Parse a raw query value as i64, treating junk as absent.
fn lenient_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

impl ListShopsQuery {
    /// Resolve raw parameters into repository search parameters.
    ///
    /// Malformed or partial coordinates fall back to the no-geo path; a
    /// malformed radius falls back to `default_radius_km`.
    fn into_search(self, default_radius_km: f64, max_page_size: i64) -> PublicSearch {
        let lat = lenient_f64(self.lat.as_deref());
        let lng = lenient_f64(self.lng.as_deref());
        let center = match (lat, lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng).ok(),
            _ => None,
        };

        let radius_km = lenient_f64(self.radius_km.as_deref())
            .filter(|r| r.is_finite() && *r > 0.0)
            .map_or(default_radius_km, |r| r.min(MAX_RADIUS_KM));

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let tags: Vec<String> = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        let limit = lenient_i64(self.limit.as_deref())
            .filter(|n| *n > 0)
            .map_or(DEFAULT_PAGE_SIZE, |n| n.min(max_page_size));

        PublicSearch {
            center,
            radius_km,
            search,
            tags: if tags.is_empty() { None } else { Some(tags) },
            limit,
        }
    }
}

/// GET /shops - public listing and nearby search.
///
/// With `lat`+`lng`: approved shops within `radius_km` (default 10),
/// nearest first, each annotated with `distance_km`. Without coordinates:
/// approved shops, most recent first. `search` and `tags` filter both
/// paths.
#[instrument(skip(state))]
async fn list_shops(
    State(state): State<AppState>,
    Query(query): Query<ListShopsQuery>,
) -> Result<Json<ShopListResponse>> {
    let params = query.into_search(
        state.config().default_radius_km,
        state.config().max_page_size,
    );

    let shops = ShopRepository::new(state.pool())
        .search_public(params)
        .await?;

    let count = shops.len();
    Ok(Json(ShopListResponse { shops, count }))
}

/// GET /shops/{id} - single shop.
///
/// Non-approved shops are only visible to their owner and to admins; anyone
/// else gets 404 rather than a hint that the listing exists.
#[instrument(skip(state, viewer))]
async fn get_shop(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(id): Path<ShopId>,
) -> Result<Json<Shop>> {
    let shop = ShopRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("shop {id}")))?;

    let viewer = viewer.map(|u| (u.id, u.role));
    if !shop.visible_to(viewer) {
        return Err(AppError::NotFound(format!("shop {id}")));
    }

    Ok(Json(shop))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        lat: Option<&str>,
        lng: Option<&str>,
        radius: Option<&str>,
    ) -> ListShopsQuery {
        ListShopsQuery {
            lat: lat.map(String::from),
            lng: lng.map(String::from),
            radius_km: radius.map(String::from),
            ..ListShopsQuery::default()
        }
    }

    #[test]
    fn test_valid_coordinates_resolve_center() {
        let params = query(Some("13.7563"), Some("100.5018"), None).into_search(10.0, 100);
        let center = params.center.expect("center");
        assert!((center.latitude() - 13.7563).abs() < f64::EPSILON);
        assert!((params.radius_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_coordinates_fall_back() {
        assert!(query(Some("abc"), Some("100.5"), None)
            .into_search(10.0, 100)
            .center
            .is_none());
        // One coordinate alone is not a center.
        assert!(query(Some("13.75"), None, None)
            .into_search(10.0, 100)
            .center
            .is_none());
        // Out-of-range pairs degrade too.
        assert!(query(Some("95.0"), Some("100.5"), None)
            .into_search(10.0, 100)
            .center
            .is_none());
    }

    #[test]
    fn test_radius_defaults_and_caps() {
        let params = query(Some("13.75"), Some("100.5"), Some("-3")).into_search(10.0, 100);
        assert!((params.radius_km - 10.0).abs() < f64::EPSILON);

        let params = query(Some("13.75"), Some("100.5"), Some("9999")).into_search(10.0, 100);
        assert!((params.radius_km - MAX_RADIUS_KM).abs() < f64::EPSILON);

        let params = query(Some("13.75"), Some("100.5"), Some("5")).into_search(10.0, 100);
        assert!((params.radius_km - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tags_split_and_trimmed() {
        let q = ListShopsQuery {
            tags: Some(" coffee, thai ,,dessert ".to_string()),
            ..ListShopsQuery::default()
        };
        let params = q.into_search(10.0, 100);
        assert_eq!(
            params.tags.expect("tags"),
            vec!["coffee", "thai", "dessert"]
        );
    }

    #[test]
    fn test_blank_search_dropped() {
        let q = ListShopsQuery {
            search: Some("   ".to_string()),
            ..ListShopsQuery::default()
        };
        assert!(q.into_search(10.0, 100).search.is_none());
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let q = ListShopsQuery {
            limit: Some("5000".to_string()),
            ..ListShopsQuery::default()
        };
        assert_eq!(q.into_search(10.0, 100).limit, 100);

        let q = ListShopsQuery::default();
        assert_eq!(q.into_search(10.0, 100).limit, DEFAULT_PAGE_SIZE);
    }
}
