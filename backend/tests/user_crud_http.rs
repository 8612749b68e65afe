//! End-to-end HTTP tests for the user CRUD surface over the in-memory store.
use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use user_service::Trace;
use user_service::domain::TRACE_ID_HEADER;
use user_service::inbound::http::state::HttpState;
use user_service::inbound::http::users;
use user_service::outbound::memory::InMemoryUserRepository;

const LIST_LIMIT: usize = 100;

#[fixture]
fn state() -> HttpState {
    HttpState::from_repository(Arc::new(InMemoryUserRepository::new()), LIST_LIMIT)
}

async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(users::configure),
    )
    .await
}

async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> (StatusCode, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

async fn create(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    surname: &str,
) -> String {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/user/")
            .set_json(json!({ "name": name, "surname": surname })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().expect("created id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn created_user_reads_back_unchanged(state: HttpState) {
    let app = init_app(state).await;
    let id = create(&app, "mario", "rossi").await;

    let (status, body) = send(&app, test::TestRequest::get().uri(&format!("/user/{id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id, "name": "mario", "surname": "rossi" }));
}

#[rstest]
#[actix_web::test]
async fn deleting_an_unknown_user_succeeds(state: HttpState) {
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        test::TestRequest::delete().uri("/user/655ba3d28d4531f9e785989d"),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn partial_update_leaves_other_fields(state: HttpState) {
    let app = init_app(state).await;
    let id = create(&app, "mario", "rossi").await;
    let uri = format!("/user/{id}");

    let (status, body) = send(
        &app,
        test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "surname": "bianchi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["surname"], json!("bianchi"));

    let (_, stored) = send(&app, test::TestRequest::get().uri(&uri)).await;
    assert_eq!(stored, json!({ "id": id, "name": "mario", "surname": "bianchi" }));
}

#[rstest]
#[actix_web::test]
async fn listing_is_capped_at_the_limit(state: HttpState) {
    let app = init_app(state).await;
    let mut ids = Vec::new();
    for index in 0..150 {
        ids.push(create(&app, &format!("user{index}"), "rossi").await);
    }

    let (status, body) = send(&app, test::TestRequest::get().uri("/user/")).await;

    assert_eq!(status, StatusCode::OK);
    let listed: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|user| user["id"].as_str().expect("id"))
        .collect();
    assert_eq!(listed.len(), LIST_LIMIT);
    assert_eq!(listed, ids[..LIST_LIMIT].iter().map(String::as_str).collect::<Vec<_>>());
}

#[rstest]
#[case::get(test::TestRequest::get())]
#[case::patch(test::TestRequest::patch().set_json(json!({ "name": "luigi" })))]
#[case::delete(test::TestRequest::delete())]
#[actix_web::test]
async fn malformed_id_is_a_bad_request(state: HttpState, #[case] request: test::TestRequest) {
    let app = init_app(state).await;

    let (status, body) = send(&app, request.uri("/user/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["code"], json!("invalid_object_id"));
}

#[rstest]
#[actix_web::test]
async fn delete_all_empties_the_listing(state: HttpState) {
    let app = init_app(state).await;
    for _ in 0..5 {
        create(&app, "mario", "rossi").await;
    }

    let (status, _) = send(&app, test::TestRequest::delete().uri("/user")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, test::TestRequest::get().uri("/user/")).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn error_bodies_carry_the_response_trace_id(state: HttpState) {
    let app = init_app(state).await;

    let request = test::TestRequest::get()
        .uri("/user/655ba3d28d4531f9e785989d")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["traceId"], json!(header));
}

#[rstest]
#[actix_web::test]
async fn unknown_body_fields_are_rejected(state: HttpState) {
    let app = init_app(state).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/user/")
            .set_json(json!({ "name": "mario", "surname": "rossi", "email": "m@r.it" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}
