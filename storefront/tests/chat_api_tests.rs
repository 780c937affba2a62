// storefront/tests/chat_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::{setup_tracing, GatewayReply, ScriptedModel, TestBackends};
use ziben_storefront::web::configure_app_routes;

#[actix_web::test]
async fn chat_streams_framed_chunks() {
  setup_tracing();
  let mut backends = TestBackends::new(GatewayReply::Unreachable);
  backends.chat_model = ScriptedModel::replying(&["안녕하세요.", " \"ZIBEN\"\n입니다"]);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/chat")
    .set_json(json!({
      "messages": [
        { "role": "user", "content": "안전화 추천해줘" },
        { "role": "assistant", "content": "어떤 현장인가요?" },
        { "role": "user", "content": "전기 공사요" }
      ],
      "apiKey": "AIza-test"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get("content-type").unwrap().to_str().unwrap(),
    "text/plain; charset=utf-8"
  );
  let body = test::read_body(resp).await;
  assert_eq!(
    std::str::from_utf8(&body).unwrap(),
    "0:\"안녕하세요.\"\n0:\" \\\"ZIBEN\\\"\\n입니다\"\n"
  );

  let turn = backends.chat_model.last_turn.lock().unwrap().clone().unwrap();
  assert_eq!(turn.api_key, "AIza-test");
  assert_eq!(turn.model, "gemini-2.5-flash");
  assert_eq!(turn.history.len(), 2);
  assert_eq!(turn.prompt, "전기 공사요");
}

#[actix_web::test]
async fn chat_without_api_key_is_rejected_before_upstream() {
  setup_tracing();
  let backends = TestBackends::new(GatewayReply::Unreachable);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/chat")
    .set_json(json!({ "messages": [{ "role": "user", "content": "hi" }] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(backends.chat_model.last_turn.lock().unwrap().is_none());
}

#[actix_web::test]
async fn upstream_quota_maps_to_429() {
  setup_tracing();
  let mut backends = TestBackends::new(GatewayReply::Unreachable);
  backends.chat_model = ScriptedModel::over_quota();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/chat")
    .set_json(json!({ "messages": [{ "role": "user", "content": "hi" }], "apiKey": "k", "model": "gemini-2.5-pro" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["code"], "UPSTREAM_QUOTA_EXCEEDED");
}

#[actix_web::test]
async fn chat_with_path_like_model_is_rejected_before_upstream() {
  setup_tracing();
  let backends = TestBackends::new(GatewayReply::Unreachable);
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(backends.state()))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/api/chat")
    .set_json(json!({ "messages": [{ "role": "user", "content": "hi" }], "apiKey": "k", "model": "../../v1/files?x=" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["code"], "VALIDATION_ERROR");
  assert!(backends.chat_model.last_turn.lock().unwrap().is_none());
}
