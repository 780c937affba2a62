// storefront/tests/catalog_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::Value;

use common::{setup_tracing, GatewayReply, TestBackends};
use ziben_storefront::web::configure_app_routes;

fn names(body: &Value, key: &str) -> Vec<String> {
  body[key]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v["name"].as_str().unwrap().to_string())
    .collect()
}

#[actix_web::test]
async fn catalog_reads() {
  setup_tracing();
  let backends = TestBackends::new(GatewayReply::Unreachable);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let body: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/products").to_request()).await;
  assert_eq!(names(&body, "products"), vec!["경량 안전화", "동계 방한 파카", "절연 안전화"]);

  let req = test::TestRequest::get()
    .uri("/api/products?category=%EC%95%88%EC%A0%84%ED%99%94")
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(names(&body, "products"), vec!["경량 안전화", "절연 안전화"]);

  let body: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/products/shoe-1").to_request()).await;
  assert_eq!(body["product"]["price"], 95_000);
  assert_eq!(body["product"]["imageUrl"], "");

  let body: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/categories").to_request()).await;
  assert_eq!(names(&body, "categories"), vec!["춘하복", "추동복", "안전화"]);
}

#[actix_web::test]
async fn unknown_product_is_not_found() {
  setup_tracing();
  let backends = TestBackends::new(GatewayReply::Unreachable);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/products/nope").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["code"], "NOT_FOUND");
  assert_eq!(body["message"], "Product with ID nope not found.");
}

#[actix_web::test]
async fn health_check() {
  let backends = TestBackends::new(GatewayReply::Unreachable);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;
  let body: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(body["status"], "ok");
}
