//! Shop repository: CRUD, moderation, and the nearby search.
//!
//! The radius query is delegated to PostGIS: `ST_DWithin` over the generated
//! `geography(Point, 4326)` column gives an index-accelerated hard cutoff,
//! and `ST_Distance` supplies the exact geodesic distance for ordering. The
//! public contract is kilometers; meters exist only inside these calls.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use shopdex_core::{GeoPoint, ShopId, ShopStatus, UserId};

use super::RepositoryError;
use crate::models::{Shop, ShopDraft, ShopPatch};

/// Raw `shops` row, plus the computed distance on nearby queries.
///
/// Non-geo queries select `NULL` for `distance_km` so a single row type
/// covers every read path.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: ShopId,
    owner_id: UserId,
    shop_name: String,
    description: Option<String>,
    category: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    website: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    tags: Vec<String>,
    images: JsonValue,
    promotions: JsonValue,
    menu: JsonValue,
    opening_hours: JsonValue,
    status: ShopStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    distance_km: Option<f64>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = RepositoryError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        // The schema enforces that latitude and longitude are set together.
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng).map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid coordinates for shop {}: {e}",
                    row.id
                ))
            })?),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "shop {} has a partial coordinate pair",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            shop_name: row.shop_name,
            description: row.description,
            category: row.category,
            address: row.address,
            phone: row.phone,
            email: row.email,
            website: row.website,
            location,
            tags: row.tags,
            images: row.images,
            promotions: row.promotions,
            menu: row.menu,
            opening_hours: row.opening_hours,
            status: row.status,
            distance_km: row.distance_km,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SHOP_COLUMNS: &str = "id, owner_id, shop_name, description, category, address, phone, \
     email, website, latitude, longitude, tags, images, promotions, menu, opening_hours, \
     status, created_at, updated_at";

/// Parameters for the public listing/search path.
///
/// `center` absent means the no-geo fallback: same filters, most recent
/// first, no distances.
#[derive(Debug, Clone)]
pub struct PublicSearch {
    pub center: Option<GeoPoint>,
    /// Hard cutoff radius in kilometers.
    pub radius_km: f64,
    /// Case-insensitive substring over name + description.
    pub search: Option<String>,
    /// Tag overlap: any shared tag qualifies.
    pub tags: Option<Vec<String>>,
    pub limit: i64,
}

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new shop. Status always starts at `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        owner_id: UserId,
        draft: ShopDraft,
    ) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "INSERT INTO shops \
                 (owner_id, shop_name, description, category, address, phone, email, website, \
                  latitude, longitude, tags, images, promotions, menu, opening_hours) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {SHOP_COLUMNS}, NULL::double precision AS distance_km"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(owner_id)
            .bind(&draft.shop_name)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.address)
            .bind(&draft.phone)
            .bind(&draft.email)
            .bind(&draft.website)
            .bind(draft.location.latitude())
            .bind(draft.location.longitude())
            .bind(&draft.tags)
            .bind(&draft.images)
            .bind(&draft.promotions)
            .bind(&draft.menu)
            .bind(&draft.opening_hours)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// Get a shop by id, any status. Visibility is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS}, NULL::double precision AS distance_km \
             FROM shops WHERE id = $1"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Apply a partial update. Absent patch fields leave columns untouched;
    /// `owner_id`, `status`, and `created_at` are never written here.
    ///
    /// Editing does not reset an approved shop to `pending` - moderation
    /// re-review is a separate, explicit admin action.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no shop matches the id,
    /// `RepositoryError::Database` for other failures.
    pub async fn update(&self, id: ShopId, patch: ShopPatch) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "UPDATE shops SET \
                 shop_name     = COALESCE($2, shop_name), \
                 description   = COALESCE($3, description), \
                 category      = COALESCE($4, category), \
                 address       = COALESCE($5, address), \
                 phone         = COALESCE($6, phone), \
                 email         = COALESCE($7, email), \
                 website       = COALESCE($8, website), \
                 latitude      = COALESCE($9, latitude), \
                 longitude     = COALESCE($10, longitude), \
                 tags          = COALESCE($11, tags), \
                 images        = COALESCE($12, images), \
                 promotions    = COALESCE($13, promotions), \
                 menu          = COALESCE($14, menu), \
                 opening_hours = COALESCE($15, opening_hours), \
                 updated_at    = NOW() \
             WHERE id = $1 \
             RETURNING {SHOP_COLUMNS}, NULL::double precision AS distance_km"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .bind(&patch.shop_name)
            .bind(&patch.description)
            .bind(&patch.category)
            .bind(&patch.address)
            .bind(&patch.phone)
            .bind(&patch.email)
            .bind(&patch.website)
            .bind(patch.location.as_ref().map(GeoPoint::latitude))
            .bind(patch.location.as_ref().map(GeoPoint::longitude))
            .bind(&patch.tags)
            .bind(&patch.images)
            .bind(&patch.promotions)
            .bind(&patch.menu)
            .bind(&patch.opening_hours)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Hard-delete a shop. No tombstones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no shop matches the id,
    /// `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: ShopId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Transition a shop's moderation status (admin action).
    ///
    /// Target validity (`approved`/`rejected` only) is checked at the route
    /// boundary; this just writes and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no shop matches the id,
    /// `RepositoryError::Database` for other failures.
    pub async fn set_status(
        &self,
        id: ShopId,
        status: ShopStatus,
    ) -> Result<Shop, RepositoryError> {
        let sql = format!(
            "UPDATE shops SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SHOP_COLUMNS}, NULL::double precision AS distance_km"
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Public listing/search. Only approved shops, ever.
    ///
    /// With a center point: index-accelerated radius cutoff (shops beyond
    /// `radius_km` are excluded, not de-prioritized), ordered nearest first
    /// with `created_at, id` as the stable tie-break. Without one: the same
    /// filters, most recent first, no distance annotation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_public(&self, params: PublicSearch) -> Result<Vec<Shop>, RepositoryError> {
        let rows = if let Some(center) = params.center {
            let sql = format!(
                "SELECT {SHOP_COLUMNS}, \
                        ST_Distance(location, \
                                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography) \
                            / 1000.0 AS distance_km \
                 FROM shops \
                 WHERE status = 'approved' \
                   AND location IS NOT NULL \
                   AND ST_DWithin(location, \
                                  ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography, $3) \
                   AND ($4::text IS NULL \
                        OR shop_name ILIKE '%' || $4 || '%' \
                        OR description ILIKE '%' || $4 || '%') \
                   AND ($5::text[] IS NULL OR tags && $5) \
                 ORDER BY distance_km ASC, created_at ASC, id ASC \
                 LIMIT $6"
            );
            sqlx::query_as::<_, ShopRow>(&sql)
                .bind(center.longitude())
                .bind(center.latitude())
                .bind(params.radius_km * 1000.0)
                .bind(&params.search)
                .bind(&params.tags)
                .bind(params.limit)
                .fetch_all(self.pool)
                .await?
        } else {
            let sql = format!(
                "SELECT {SHOP_COLUMNS}, NULL::double precision AS distance_km \
                 FROM shops \
                 WHERE status = 'approved' \
                   AND ($1::text IS NULL \
                        OR shop_name ILIKE '%' || $1 || '%' \
                        OR description ILIKE '%' || $1 || '%') \
                   AND ($2::text[] IS NULL OR tags && $2) \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $3"
            );
            sqlx::query_as::<_, ShopRow>(&sql)
                .bind(&params.search)
                .bind(&params.tags)
                .bind(params.limit)
                .fetch_all(self.pool)
                .await?
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// All shops belonging to an owner, any status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Shop>, RepositoryError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS}, NULL::double precision AS distance_km \
             FROM shops WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Admin listing: any status, optional status filter, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_admin(
        &self,
        status: Option<ShopStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Shop>, RepositoryError> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS}, NULL::double precision AS distance_km \
             FROM shops \
             WHERE ($1::shop_status IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
