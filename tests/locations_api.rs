#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use common::{ADMIN_ID, USER_ID, bearer, place, seeded};

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["place_id"].as_str().expect("place_id").to_string())
        .collect()
}

#[actix_web::test]
async fn first_page_of_twenty_five_has_more() {
    let app = test_app!(seeded((1..=25).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations?page=1&limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(25));
    assert_eq!(body["hasMore"], json!(true));
    assert_eq!(body["nextPage"], json!(2));
    let ids = ids(&body);
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], "place-25");
    assert_eq!(ids[9], "place-16");
}

#[actix_web::test]
async fn last_page_is_partial_and_terminal() {
    let app = test_app!(seeded((1..=25).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations?page=3&limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body), vec!["place-5", "place-4", "place-3", "place-2", "place-1"]);
    assert_eq!(body["hasMore"], json!(false));
    assert_eq!(body["nextPage"], Value::Null);
    assert_eq!(body["total"], json!(25));
}

#[actix_web::test]
async fn unparseable_page_and_limit_fall_back_to_defaults() {
    let app = test_app!(seeded((1..=12).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations?page=abc&limit=")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body).len(), 10);
    assert_eq!(body["nextPage"], json!(2));
}

#[actix_web::test]
async fn empty_store_is_a_successful_empty_page() {
    let app = test_app!(seeded(Vec::new()));

    let req = test::TestRequest::get().uri("/api/locations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["total"], json!(0));
    assert_eq!(body["hasMore"], json!(false));
}

#[actix_web::test]
async fn public_listing_ignores_inactive_filter() {
    let mut rows: Vec<_> = (1..=5).map(place).collect();
    rows[0].active = false;
    rows[1].active = false;
    let app = test_app!(seeded(rows));

    let req = test::TestRequest::get()
        .uri("/api/locations?active=false")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], json!(3));
    for row in body["data"].as_array().expect("data array") {
        assert_eq!(row["active"], json!(true));
    }
}

#[actix_web::test]
async fn admin_listing_honors_active_filter() {
    let mut rows: Vec<_> = (1..=5).map(place).collect();
    rows[0].active = false;
    rows[1].active = false;
    let app = test_app!(seeded(rows));

    let req = test::TestRequest::get()
        .uri("/api/locations/admin?active=false")
        .insert_header(bearer(ADMIN_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], json!(2));
    assert_eq!(ids(&body), vec!["place-2", "place-1"]);
}

#[actix_web::test]
async fn filters_and_sort_combine() {
    let mut rows: Vec<_> = (1..=4).map(place).collect();
    rows[0].categories = vec!["Beach".into()];
    rows[0].rating = 4.8;
    rows[1].categories = vec!["Beach".into(), "Nature".into()];
    rows[1].rating = 4.2;
    rows[2].categories = vec!["Nature".into()];
    rows[2].rating = 3.0;
    rows[3].categories = vec!["City".into()];
    rows[3].rating = 5.0;
    let app = test_app!(seeded(rows));

    let req = test::TestRequest::get()
        .uri("/api/locations?categories=Beach,Nature&rating=4&sort=rating")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body), vec!["place-1", "place-2"]);
    assert_eq!(body["total"], json!(2));
}

#[actix_web::test]
async fn non_numeric_rating_is_rejected_with_envelope() {
    let app = test_app!(seeded((1..=3).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations?rating=high")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("rating must be a number"));
}

#[actix_web::test]
async fn admin_routes_require_an_admin() {
    let app = test_app!(seeded((1..=3).map(place).collect()));

    let anonymous = test::TestRequest::get()
        .uri("/api/locations/admin/stat")
        .to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));

    let user = test::TestRequest::get()
        .uri("/api/locations/admin")
        .insert_header(bearer(USER_ID))
        .to_request();
    let resp = test::call_service(&app, user).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let forged = test::TestRequest::get()
        .uri("/api/locations/admin")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, forged).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn similar_returns_overlapping_active_rows_by_rating() {
    let mut rows: Vec<_> = (1..=6).map(place).collect();
    rows[0].place_id = "X".into();
    rows[0].categories = vec!["Beach".into(), "Nature".into()];
    rows[1].categories = vec!["Beach".into()];
    rows[1].rating = 3.5;
    rows[2].categories = vec!["Nature".into()];
    rows[2].rating = 4.9;
    rows[3].categories = vec!["Nature".into(), "City".into()];
    rows[3].rating = 4.1;
    rows[4].categories = vec!["City".into()];
    rows[4].rating = 5.0;
    rows[5].categories = vec!["Beach".into()];
    rows[5].rating = 5.0;
    rows[5].active = false;
    let app = test_app!(seeded(rows));

    let req = test::TestRequest::get()
        .uri("/api/locations/similar/X")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body), vec!["place-3", "place-4", "place-2"]);
}

#[actix_web::test]
async fn similar_for_unknown_listing_is_empty() {
    let app = test_app!(seeded((1..=3).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations/similar/missing")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn inactive_listing_is_hidden_from_the_public() {
    let mut rows: Vec<_> = (1..=2).map(place).collect();
    rows[1].active = false;
    let app = test_app!(seeded(rows));

    let public = test::TestRequest::get()
        .uri("/api/locations/place-2")
        .to_request();
    let resp = test::call_service(&app, public).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Place not found"));

    let admin = test::TestRequest::get()
        .uri("/api/locations/place-2")
        .insert_header(bearer(ADMIN_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, admin).await;
    assert_eq!(body["data"]["place_id"], json!("place-2"));
    assert_eq!(body["data"]["active"], json!(false));
}

#[actix_web::test]
async fn stale_token_on_detail_page_reads_as_anonymous() {
    let app = test_app!(seeded((1..=1).map(place).collect()));

    let req = test::TestRequest::get()
        .uri("/api/locations/place-1")
        .insert_header(("Authorization", "Bearer expired-or-garbage"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["place_id"], json!("place-1"));
}

#[actix_web::test]
async fn set_active_toggles_and_missing_id_fails() {
    let app = test_app!(seeded((1..=2).map(place).collect()));

    let req = test::TestRequest::patch()
        .uri("/api/locations/admin/place-1/active")
        .insert_header(bearer(ADMIN_ID))
        .set_json(json!({ "active": false }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["active"], json!(false));

    let req = test::TestRequest::get().uri("/api/locations").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body), vec!["place-2"]);

    let req = test::TestRequest::patch()
        .uri("/api/locations/admin/missing/active")
        .insert_header(bearer(ADMIN_ID))
        .set_json(json!({ "active": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], json!("Failed to update"));

    let req = test::TestRequest::get()
        .uri("/api/locations/admin")
        .insert_header(bearer(ADMIN_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(2));
}

#[actix_web::test]
async fn malformed_json_body_uses_error_envelope() {
    let app = test_app!(seeded((1..=1).map(place).collect()));

    let req = test::TestRequest::patch()
        .uri("/api/locations/admin/place-1/active")
        .insert_header(bearer(ADMIN_ID))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"active\": \"maybe\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
async fn stats_count_every_bucket() {
    let mut rows: Vec<_> = (1..=4).map(place).collect();
    rows[0].active = false;
    rows[1].is_featured = true;
    rows[2].is_featured = true;
    let app = test_app!(seeded(rows));

    let req = test::TestRequest::get()
        .uri("/api/locations/admin/stat")
        .insert_header(bearer(ADMIN_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let data = &body["data"];
    assert_eq!(data["total"], json!(4));
    assert_eq!(data["active"], json!(3));
    assert_eq!(data["inactive"], json!(1));
    assert_eq!(data["featured"], json!(2));
    let change = data["thisMonth"].as_i64().unwrap() - data["lastMonth"].as_i64().unwrap();
    assert_eq!(data["monthlyChange"], json!(change));
}

#[actix_web::test]
async fn created_listing_gets_next_free_slug() {
    let mut existing = place(1);
    existing.slug = "ha-long-bay".into();
    let app = test_app!(seeded(vec![existing]));

    let req = test::TestRequest::post()
        .uri("/api/locations/admin/new")
        .insert_header(bearer(ADMIN_ID))
        .set_json(json!({
            "name": "Hạ Long Bay",
            "location": "Quảng Ninh",
            "images": ["https://img.example/halong.jpg"],
            "categories": ["Beach", " beach ", "Nature", ""],
            "description": "Limestone karsts",
            "lat": 20.91,
            "lon": 107.18,
            "isFeatured": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["slug"], json!("ha-long-bay-1"));
    assert_eq!(data["categories"], json!(["Beach", "Nature"]));
    assert_eq!(data["rating"], json!(0.0));
    assert_eq!(data["reviews"], json!(0));
    assert_eq!(data["active"], json!(true));
    assert_eq!(data["is_featured"], json!(true));
}

#[actix_web::test]
async fn created_listing_rejects_out_of_range_coordinates() {
    let app = test_app!(seeded(Vec::new()));

    let req = test::TestRequest::post()
        .uri("/api/locations/admin/new")
        .insert_header(bearer(ADMIN_ID))
        .set_json(json!({ "name": "Nowhere", "lat": 91.0, "lon": 0.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
