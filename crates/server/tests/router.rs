//! Full HTTP round-trips over in-memory repositories. No database needed.

use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;
use service::identifier::IdGenerator;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.expect("post")
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("get")
    }

    async fn created_id(&self, path: &str, body: Value) -> String {
        let res = self.post(path, body).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let v: Value = res.json().await.expect("json");
        v["id"].as_str().expect("id").to_string()
    }
}

async fn start_server() -> TestApp {
    let app = routes::build_router(AppState::in_memory(IdGenerator::default()), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    TestApp { base_url: format!("http://{}", addr), client: reqwest::Client::new() }
}

fn ada(teaching: &[&str]) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "timezone": "Europe/London",
        "is_mentor": true,
        "teaching": teaching,
    })
}

#[tokio::test]
async fn health_and_docs() {
    let app = start_server().await;
    let res = app.get("/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["status"], "ok");

    let res = app.get("/api-docs/openapi.json").await;
    assert_eq!(res.status(), StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert!(v["paths"]["/v1/skills"].is_object());
}

#[tokio::test]
async fn skill_post_then_get() {
    let app = start_server().await;
    let id = app.created_id("/v1/skills", json!({"name": "Rust", "added": "2024-01-01", "authorized": 0})).await;
    assert_eq!(id.len(), 10);

    let res = app.get(&format!("/v1/skills/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["name"], "Rust");
    assert_eq!(v["authorized"], false);
    assert_eq!(v["added"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn skill_errors_use_envelope() {
    let app = start_server().await;

    let res = app.get("/v1/skills/nothex!!!!").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["code"], "not_found");
    assert_eq!(v["error"], "Not Found");

    let res = app.post("/v1/skills", json!({"name": "   "})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["code"], "bad_request");

    let res = app.post("/v1/skills", json!({"authorized": true})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/v1/skills", json!({"name": "Go", "added": "yesterday"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/v1/skills?term=").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn skill_put_search_delete() {
    let app = start_server().await;
    let id = app.created_id("/v1/skills", json!({"name": "Python"})).await;

    let res = app
        .client
        .put(app.url(&format!("/v1/skills/{id}")))
        .json(&json!({"name": "Python 3", "authorized": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["authorized"], true);

    let res = app.get("/v1/skills?term=thon").await;
    let hits: Vec<Value> = res.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Python 3");

    let res = app.client.delete(app.url(&format!("/v1/skills/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.client.delete(app.url(&format!("/v1/skills/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_detail_resolves_skills_and_partnerships() {
    let app = start_server().await;
    let rust = app.created_id("/v1/skills", json!({"name": "Rust"})).await;
    let ada_id = app.created_id("/v1/users", ada(&[&rust])).await;
    let bob_id = app
        .created_id(
            "/v1/users",
            json!({"first_name": "Bob", "last_name": "Babbage", "email": "bob@example.com", "timezone": "UTC", "learning": [rust]}),
        )
        .await;
    app.created_id("/v1/partnerships", json!({"mentor": ada_id, "apprentice": bob_id})).await;

    let res = app.get(&format!("/v1/users/{ada_id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["first_name"], "Ada");
    assert_eq!(v["teaching"][0], rust.as_str());
    assert_eq!(v["skills"]["teaching"][0]["name"], "Rust");
    assert_eq!(v["partnerships"]["mentoring"][0]["apprentice"], bob_id.as_str());
    assert!(v["partnerships"]["apprenticing"].as_array().unwrap().is_empty());

    let res = app.get("/v1/users").await;
    let all: Vec<Value> = res.json().await.unwrap();
    let names: Vec<_> = all.iter().map(|u| u["last_name"].as_str().unwrap().to_string()).collect();
    assert_eq!(names, ["Babbage", "Lovelace"]);
}

#[tokio::test]
async fn user_update_and_delete() {
    let app = start_server().await;
    let id = app.created_id("/v1/users", ada(&[])).await;

    let mut body = ada(&[]);
    body["last_name"] = json!("King");
    let res = app.client.put(app.url(&format!("/v1/users/{id}"))).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.client.put(app.url("/v1/users/0000000000")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.client.put(app.url("/v1/users/bad")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    body["email"] = json!("no-at-sign");
    let res = app.client.put(app.url(&format!("/v1/users/{id}"))).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.client.delete(app.url(&format!("/v1/users/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.get(&format!("/v1/users/{id}")).await.status(), StatusCode::NOT_FOUND);
    let res = app.client.delete(app.url("/v1/users/zzz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_post_rejects_bad_input() {
    let app = start_server().await;
    let res = app.post("/v1/users", ada(&["not-an-id"])).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/v1/users", json!({"first_name": "Ada"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .client
        .post(app.url("/v1/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let mut with_id = ada(&[]);
    with_id["id"] = json!("abcdef0123");
    assert_eq!(app.post("/v1/users", with_id.clone()).await.status(), StatusCode::CREATED);
    assert_eq!(app.post("/v1/users", with_id).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_fields_past_column_limits_are_rejected() {
    let app = start_server().await;
    let mut body = ada(&[]);
    body["twitter"] = json!("t".repeat(65));
    let res = app.post("/v1/users", body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v: Value = res.json().await.unwrap();
    assert_eq!(v["code"], "bad_request");

    let mut body = ada(&[]);
    body["email"] = json!(format!("{}@example.com", "a".repeat(300)));
    assert_eq!(app.post("/v1/users", body).await.status(), StatusCode::BAD_REQUEST);

    let id = app.created_id("/v1/users", ada(&[])).await;
    let mut body = ada(&[]);
    body["timezone"] = json!("z".repeat(70));
    let res = app.client.put(app.url(&format!("/v1/users/{id}"))).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_detail_is_not_found() {
    let app = start_server().await;
    for path in ["/v1/users/abcdefabcd", "/v1/users/not-an-id"] {
        let res = app.get(path).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let v: Value = res.json().await.unwrap();
        assert_eq!(v["code"], "not_found");
        assert_eq!(v["detail"], "user not found");
    }
}

#[tokio::test]
async fn partnerships_by_role() {
    let app = start_server().await;
    // users need not exist
    let (mentor, apprentice) = ("aaaaaaaaaa", "bbbbbbbbbb");
    let pid = app.created_id("/v1/partnerships", json!({"mentor": mentor, "apprentice": apprentice})).await;

    let res = app.get(&format!("/v1/partnerships/{mentor}?role=MENTOR")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<Value> = res.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], pid.as_str());

    let res = app.get(&format!("/v1/partnerships/{apprentice}?role=apprentice")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/v1/partnerships/{pid}?role=other")).await;
    let list: Vec<Value> = res.json().await.unwrap();
    assert_eq!(list[0]["mentor"], mentor);

    assert_eq!(app.get(&format!("/v1/partnerships/{mentor}")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/v1/partnerships/nope").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partnership_create_and_delete_errors() {
    let app = start_server().await;
    let res = app.post("/v1/partnerships", json!({"mentor": "bad", "apprentice": "bbbbbbbbbb"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let pid = app.created_id("/v1/partnerships", json!({"mentor": "aaaaaaaaaa", "apprentice": "bbbbbbbbbb"})).await;
    let res = app.client.delete(app.url("/v1/partnerships/bad")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = app.client.delete(app.url(&format!("/v1/partnerships/{pid}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.client.delete(app.url(&format!("/v1/partnerships/{pid}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
