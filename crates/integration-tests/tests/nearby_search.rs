//! Nearby search: radius cutoff, distance ordering, graceful degradation.
//!
//! Run with: cargo test -p shopdex-integration-tests -- --ignored

use serde_json::Value;

use shopdex_integration_tests::{
    approve_shop, approved_member, base_url, client, create_shop, shop_body,
};

/// Central Bangkok, the reference point for the distance fixtures.
const CENTER: (f64, f64) = (13.7563, 100.5018);

async fn search(client: &reqwest::Client, query: &str) -> Vec<Value> {
    let resp = client
        .get(format!("{}/shops{query}", base_url()))
        .send()
        .await
        .expect("search request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("search response not JSON");
    body["shops"].as_array().expect("shops array").clone()
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn radius_cutoff_and_ordering() {
    let client = client();
    let (subject, _) = approved_member(&client).await;

    // ~3 km from the center: inside a 5 km radius.
    let near = create_shop(&client, &subject, shop_body("Near Shop", 13.7763, 100.5218)).await;
    // ~50 km north: outside.
    let far = create_shop(&client, &subject, shop_body("Far Shop", 14.2059, 100.5018)).await;
    let near_id = near["id"].as_i64().expect("id");
    let far_id = far["id"].as_i64().expect("id");
    approve_shop(&client, near_id).await;
    approve_shop(&client, far_id).await;

    let shops = search(
        &client,
        &format!("?lat={}&lng={}&radius_km=5", CENTER.0, CENTER.1),
    )
    .await;

    let ids: Vec<i64> = shops.iter().map(|s| s["id"].as_i64().expect("id")).collect();
    assert!(ids.contains(&near_id), "3 km shop missing from 5 km radius");
    assert!(!ids.contains(&far_id), "50 km shop inside 5 km radius");

    // Every hit is annotated, within the cutoff, and ordered nearest-first.
    let mut last = 0.0_f64;
    for shop in &shops {
        let d = shop["distance_km"].as_f64().expect("distance_km annotation");
        assert!(d <= 5.0, "distance {d} exceeds radius");
        assert!(d >= last, "results not ordered by distance");
        last = d;
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn malformed_coordinates_degrade_to_recent_listing() {
    let client = client();

    // Junk coordinates must not 400; they fall back to the no-geo listing.
    let resp = client
        .get(format!("{}/shops?lat=abc&lng=100.5", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("response not JSON");
    for shop in body["shops"].as_array().expect("shops array") {
        assert!(
            shop.get("distance_km").is_none(),
            "fallback path must not annotate distances"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn tag_overlap_filters_results() {
    let client = client();
    let (subject, _) = approved_member(&client).await;

    let mut body = shop_body("Tagged Noodles", CENTER.0, CENTER.1);
    body["tags"] = serde_json::json!(["noodles", "late-night"]);
    let shop = create_shop(&client, &subject, body).await;
    let shop_id = shop["id"].as_i64().expect("id");
    approve_shop(&client, shop_id).await;

    // Any shared tag qualifies.
    let shops = search(&client, "?tags=late-night,unrelated").await;
    let ids: Vec<i64> = shops.iter().map(|s| s["id"].as_i64().expect("id")).collect();
    assert!(ids.contains(&shop_id));

    // No shared tag excludes.
    let shops = search(&client, "?tags=hardware").await;
    let ids: Vec<i64> = shops.iter().map(|s| s["id"].as_i64().expect("id")).collect();
    assert!(!ids.contains(&shop_id));
}
