//! Seed the database with sample data for local development.
//!
//! Creates a handful of Bangkok shops in varying moderation states so the
//! public, member, and admin surfaces all have something to show.

use serde_json::json;

use shopdex_api::db::{RepositoryError, ShopRepository, UserRepository, create_pool};
use shopdex_api::models::shop::{ShopDraft, ShopFields};
use shopdex_core::ShopStatus;

use super::CommandError;

/// Sample shop fixture: name, category, latitude, longitude, tags, approved.
const SAMPLE_SHOPS: &[(&str, &str, f64, f64, &[&str], bool)] = &[
    (
        "Nong's Noodles",
        "restaurant",
        13.7563,
        100.5018,
        &["noodles", "thai"],
        true,
    ),
    (
        "Siam Beans",
        "cafe",
        13.7463,
        100.5318,
        &["coffee", "dessert"],
        true,
    ),
    (
        "Chatuchak Vintage",
        "retail",
        13.7996,
        100.5502,
        &["clothes", "secondhand"],
        true,
    ),
    (
        "Riverside Grill",
        "restaurant",
        13.7262,
        100.4935,
        &["grill", "thai"],
        false,
    ),
];

/// Insert sample users and shops.
///
/// Safe to run repeatedly: the seed member account is reused if it already
/// exists, and duplicate shops are simply added again (ids differ).
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = super::database_url()?;
    let pool = create_pool(&database_url).await?;

    let users = UserRepository::new(&pool);
    let shops = ShopRepository::new(&pool);

    let owner = match users
        .register("seed|member", Some("Seed Member"), None)
        .await
    {
        Ok(user) => user,
        Err(RepositoryError::Conflict(_)) => users
            .get_by_subject("seed|member")
            .await?
            .ok_or(RepositoryError::NotFound)?,
        Err(e) => return Err(e.into()),
    };

    for (name, category, lat, lng, tags, approved) in SAMPLE_SHOPS {
        let fields = ShopFields {
            shop_name: Some((*name).to_string()),
            category: Some((*category).to_string()),
            latitude: Some(*lat),
            longitude: Some(*lng),
            tags: Some(tags.iter().map(ToString::to_string).collect()),
            menu: Some(json!([])),
            ..ShopFields::default()
        };
        let draft = ShopDraft::from_fields(fields)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let shop = shops.create(owner.id, draft).await?;
        if *approved {
            shops.set_status(shop.id, ShopStatus::Approved).await?;
        }
        tracing::info!(shop_id = %shop.id, name, approved, "seeded shop");
    }

    tracing::info!("Seed complete");
    Ok(())
}
