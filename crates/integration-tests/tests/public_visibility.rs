//! Public visibility: only approved shops ever appear on public read paths.
//!
//! Requires a running API server, a PostGIS database with migrations
//! applied, and a pre-provisioned admin account (see crate docs).
//!
//! Run with: cargo test -p shopdex-integration-tests -- --ignored

use serde_json::Value;

use shopdex_integration_tests::{
    AUTH_SUBJECT_HEADER, approve_shop, approved_member, base_url, client, create_shop, shop_body,
};

/// Fetch the public listing and collect returned shop ids.
async fn public_shop_ids(client: &reqwest::Client, query: &str) -> Vec<i64> {
    let resp = client
        .get(format!("{}/shops{query}", base_url()))
        .send()
        .await
        .expect("public list request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("list response not JSON");
    body["shops"]
        .as_array()
        .expect("shops array")
        .iter()
        .map(|s| s["id"].as_i64().expect("shop id"))
        .collect()
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn pending_shop_hidden_until_approved() {
    let client = client();
    let (subject, _) = approved_member(&client).await;

    // Freshly created shops default to pending.
    let shop = create_shop(&client, &subject, shop_body("Moderation Cafe", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("shop id");
    assert_eq!(shop["status"], "pending");

    // Pending: absent from the public listing and 404 on direct fetch.
    let ids = public_shop_ids(&client, "").await;
    assert!(!ids.contains(&shop_id), "pending shop leaked to public list");

    let resp = client
        .get(format!("{}/shops/{shop_id}", base_url()))
        .send()
        .await
        .expect("get request failed");
    assert_eq!(resp.status(), 404);

    // Approve, then the shop is public with its new status.
    approve_shop(&client, shop_id).await;

    let resp = client
        .get(format!("{}/shops/{shop_id}", base_url()))
        .send()
        .await
        .expect("get request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("shop response not JSON");
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
#[ignore = "Requires running API server and PostGIS database"]
async fn owner_sees_own_pending_shop() {
    let client = client();
    let (subject, user_id) = approved_member(&client).await;

    let shop = create_shop(&client, &subject, shop_body("Owner's Eyes Only", 13.7563, 100.5018)).await;
    let shop_id = shop["id"].as_i64().expect("shop id");

    // Direct fetch with the owner's identity succeeds despite pending status.
    let resp = client
        .get(format!("{}/shops/{shop_id}", base_url()))
        .header(AUTH_SUBJECT_HEADER, &subject)
        .send()
        .await
        .expect("get request failed");
    assert_eq!(resp.status(), 200);

    // And the member listing returns exactly the owner's shops.
    let resp = client
        .get(format!("{}/member/shops", base_url()))
        .header(AUTH_SUBJECT_HEADER, &subject)
        .send()
        .await
        .expect("member list request failed");
    assert_eq!(resp.status(), 200);
    let shops: Vec<Value> = resp.json().await.expect("member list not JSON");
    assert!(shops.iter().all(|s| s["owner_id"].as_i64() == Some(user_id)));
    assert!(shops.iter().any(|s| s["id"].as_i64() == Some(shop_id)));
}
