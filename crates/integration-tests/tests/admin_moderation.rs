//! Admin moderation: role enforcement, transition rules, account gating.
//!
//! Run with: cargo test -p shopdex-integration-tests -- --ignored

use serde_json::{Value, json};

use shopdex_integration_tests::{
    AUTH_SUBJECT_HEADER, admin_subject, approved_member, base_url, client, create_shop, shop_body,
};

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn non_admin_cannot_change_status() {
    let client = client();
    let (owner, _) = approved_member(&client).await;

    let shop = create_shop(&client, &owner, shop_body("Still Pending", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("id");

    // Even the owner cannot self-approve.
    let resp = client
        .post(format!("{}/admin/shops/{shop_id}/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, &owner)
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("status request failed");
    assert_eq!(resp.status(), 403);

    // Status unchanged.
    let resp = client
        .get(format!("{}/shops/{shop_id}", base_url()))
        .header(AUTH_SUBJECT_HEADER, &owner)
        .send()
        .await
        .expect("get request failed");
    let body: Value = resp.json().await.expect("shop response not JSON");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn status_target_must_be_a_review_outcome() {
    let client = client();
    let (owner, _) = approved_member(&client).await;

    let shop = create_shop(&client, &owner, shop_body("Back To Pending?", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("id");

    // Moderation never moves a shop back to pending.
    let resp = client
        .post(format!("{}/admin/shops/{shop_id}/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .json(&json!({ "status": "pending" }))
        .send()
        .await
        .expect("status request failed");
    assert_eq!(resp.status(), 400);

    // Unknown values never reach the store (422 from body deserialization).
    let resp = client
        .post(format!("{}/admin/shops/{shop_id}/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .json(&json!({ "status": "archived" }))
        .send()
        .await
        .expect("status request failed");
    assert!(resp.status().is_client_error());
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn re_review_is_an_explicit_action() {
    let client = client();
    let (owner, _) = approved_member(&client).await;

    let shop = create_shop(&client, &owner, shop_body("Second Chance", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("id");

    for target in ["rejected", "approved"] {
        let resp = client
            .post(format!("{}/admin/shops/{shop_id}/status", base_url()))
            .header(AUTH_SUBJECT_HEADER, admin_subject())
            .json(&json!({ "status": target }))
            .send()
            .await
            .expect("status request failed");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("status response not JSON");
        assert_eq!(body["status"], target);
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn set_status_on_missing_shop_is_not_found() {
    let client = client();

    let resp = client
        .post(format!("{}/admin/shops/999999999/status", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("status request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn admin_listing_filters_by_status() {
    let client = client();
    let (owner, _) = approved_member(&client).await;

    let shop = create_shop(&client, &owner, shop_body("Filter Me", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("id");

    let resp = client
        .get(format!("{}/admin/shops?status=pending", base_url()))
        .header(AUTH_SUBJECT_HEADER, admin_subject())
        .send()
        .await
        .expect("admin list request failed");
    assert_eq!(resp.status(), 200);

    let shops: Vec<Value> = resp.json().await.expect("admin list not JSON");
    assert!(shops.iter().all(|s| s["status"] == "pending"));
    assert!(shops.iter().any(|s| s["id"].as_i64() == Some(shop_id)));
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn anonymous_admin_paths_unauthenticated() {
    let client = client();

    let resp = client
        .get(format!("{}/admin/shops", base_url()))
        .send()
        .await
        .expect("admin list request failed");
    assert_eq!(resp.status(), 401);
}
