//! Shop domain types.
//!
//! A shop listing is the central entity of the directory. Visibility is a
//! pure function of `(shop.status, caller role, caller == owner)` and is
//! evaluated per request, never cached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use shopdex_core::{GeoError, GeoPoint, ShopId, ShopStatus, UserId, UserRole};

/// A shop listing (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    /// Unique shop ID.
    pub id: ShopId,
    /// User who created the shop. Immutable after creation.
    pub owner_id: UserId,
    /// Display name. Always non-empty.
    pub shop_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Geographic position. Serialized as `latitude`/`longitude` fields;
    /// absent for legacy rows without coordinates, which nearby queries
    /// never return.
    #[serde(flatten)]
    pub location: Option<GeoPoint>,
    /// Free-text labels. Overlap-matched in queries; order preserved for display.
    pub tags: Vec<String>,
    /// Nested structured data, opaque to the query core.
    pub images: JsonValue,
    pub promotions: JsonValue,
    pub menu: JsonValue,
    pub opening_hours: JsonValue,
    /// Moderation status. New shops start `pending`.
    pub status: ShopStatus,
    /// Distance from the query point in kilometers. Only present on
    /// nearby-search results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Whether this shop is visible to the given viewer.
    ///
    /// Anonymous callers and non-owner members only see approved shops;
    /// owners see their own shops in any status; admins see everything.
    #[must_use]
    pub fn visible_to(&self, viewer: Option<(UserId, UserRole)>) -> bool {
        if self.status == ShopStatus::Approved {
            return true;
        }
        match viewer {
            Some((id, role)) => role.is_admin() || id == self.owner_id,
            None => false,
        }
    }
}

/// Errors from validating shop input at the write boundary.
#[derive(Debug, thiserror::Error)]
pub enum ShopDraftError {
    /// `shop_name` is missing or blank.
    #[error("shop_name must not be empty")]
    EmptyName,
    /// Coordinates are missing on create.
    #[error("latitude and longitude are required")]
    MissingLocation,
    /// Only one of latitude/longitude was supplied.
    #[error("latitude and longitude must be provided together")]
    PartialLocation,
    /// Coordinates are out of range or not finite.
    #[error("invalid coordinates: {0}")]
    InvalidLocation(#[from] GeoError),
}

/// Validated input for creating a shop.
///
/// All optional-field defaulting happens here, once, so read paths never
/// need fallbacks.
#[derive(Debug, Clone)]
pub struct ShopDraft {
    pub shop_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub location: GeoPoint,
    pub tags: Vec<String>,
    pub images: JsonValue,
    pub promotions: JsonValue,
    pub menu: JsonValue,
    pub opening_hours: JsonValue,
}

/// Raw, unvalidated shop fields as they arrive in a request body.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ShopFields {
    pub shop_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<JsonValue>,
    pub promotions: Option<JsonValue>,
    pub menu: Option<JsonValue>,
    pub opening_hours: Option<JsonValue>,
}

impl ShopDraft {
    /// Validate raw request fields into a creatable draft.
    ///
    /// # Errors
    ///
    /// Returns [`ShopDraftError`] if `shop_name` is blank/missing or the
    /// location does not resolve to a valid point.
    pub fn from_fields(fields: ShopFields) -> Result<Self, ShopDraftError> {
        let shop_name = fields
            .shop_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ShopDraftError::EmptyName)?
            .to_owned();

        let location = match (fields.latitude, fields.longitude) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)?,
            (None, None) => return Err(ShopDraftError::MissingLocation),
            _ => return Err(ShopDraftError::PartialLocation),
        };

        let empty_array = || JsonValue::Array(Vec::new());
        Ok(Self {
            shop_name,
            description: fields.description,
            category: fields.category,
            address: fields.address,
            phone: fields.phone,
            email: fields.email,
            website: fields.website,
            location,
            tags: fields.tags.unwrap_or_default(),
            images: fields.images.unwrap_or_else(empty_array),
            promotions: fields.promotions.unwrap_or_else(empty_array),
            menu: fields.menu.unwrap_or_else(empty_array),
            opening_hours: fields.opening_hours.unwrap_or(JsonValue::Null),
        })
    }
}

/// Validated partial update for a shop.
///
/// Absent fields are left untouched. `owner_id`, `status`, and `created_at`
/// are not reachable through this type.
#[derive(Debug, Clone, Default)]
pub struct ShopPatch {
    pub shop_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub location: Option<GeoPoint>,
    pub tags: Option<Vec<String>>,
    pub images: Option<JsonValue>,
    pub promotions: Option<JsonValue>,
    pub menu: Option<JsonValue>,
    pub opening_hours: Option<JsonValue>,
}

impl ShopPatch {
    /// Validate raw request fields into a patch.
    ///
    /// # Errors
    ///
    /// Returns [`ShopDraftError`] if `shop_name` is present but blank, or
    /// coordinates are partial/invalid.
    pub fn from_fields(fields: ShopFields) -> Result<Self, ShopDraftError> {
        let shop_name = match fields.shop_name.as_deref().map(str::trim) {
            Some("") => return Err(ShopDraftError::EmptyName),
            Some(name) => Some(name.to_owned()),
            None => None,
        };

        let location = match (fields.latitude, fields.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
            (None, None) => None,
            _ => return Err(ShopDraftError::PartialLocation),
        };

        Ok(Self {
            shop_name,
            description: fields.description,
            category: fields.category,
            address: fields.address,
            phone: fields.phone,
            email: fields.email,
            website: fields.website,
            location,
            tags: fields.tags,
            images: fields.images,
            promotions: fields.promotions,
            menu: fields.menu,
            opening_hours: fields.opening_hours,
        })
    }

    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shop_name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.website.is_none()
            && self.location.is_none()
            && self.tags.is_none()
            && self.images.is_none()
            && self.promotions.is_none()
            && self.menu.is_none()
            && self.opening_hours.is_none()
    }
}
