//! Shared wiremock helpers for hosted-repository client tests

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "ghp_test_token";

/// Mount `GET {route}` returning `body` with `status`, requiring the bearer token
pub async fn mock_get(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `GET /user` for the given login
pub async fn mock_identity(server: &MockServer, login: &str) {
    mock_get(server, "/user", 200, json!({"login": login, "id": 1})).await;
}

/// Mount `POST /user/repos` answering 201 for `name` under `owner`
pub async fn mock_create_repo(server: &MockServer, owner: &str, name: &str) {
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "html_url": format!("https://github.com/{}/{}", owner, name),
            "clone_url": format!("https://github.com/{}/{}.git", owner, name),
            "private": true
        })))
        .mount(server)
        .await;
}
