//! Hosted-repository client tests against a mock API
//!
//! Tests cover:
//! - Identity lookup and credential validation
//! - Repository and branch listing
//! - Repository creation request shape and response mapping
//! - Lenient failure handling on non-2xx responses

mod common;

use common::*;
use projwiz_github::{Error, GitHubClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::new(server.uri()).unwrap()
}

#[tokio::test]
async fn test_get_identity_returns_login() {
    let server = MockServer::start().await;
    mock_identity(&server, "octocat").await;

    let client = client_for(&server);
    assert_eq!(client.get_identity(TOKEN).await.as_deref(), Some("octocat"));
    assert!(client.validate_credential(TOKEN).await);
}

#[tokio::test]
async fn test_requests_carry_accept_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("user-agent", projwiz_github::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_identity(TOKEN).await.is_some());
}

#[tokio::test]
async fn test_invalid_credential_is_rejected() {
    let server = MockServer::start().await;
    mock_get(&server, "/user", 401, json!({"message": "Bad credentials"})).await;

    let client = client_for(&server);
    assert!(client.get_identity(TOKEN).await.is_none());
    assert!(!client.validate_credential(TOKEN).await);

    let err = client.try_get_identity(TOKEN).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_list_repositories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "tmpl", "full_name": "acme/tmpl", "default_branch": "main", "private": false},
            {"name": "legacy", "full_name": "acme/legacy", "default_branch": "master"}
        ])))
        .mount(&server)
        .await;

    let repos = client_for(&server).list_repositories(TOKEN).await;
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].full_name, "acme/tmpl");
    assert_eq!(repos[1].default_branch, "master");

    let rendered = serde_json::to_value(&repos[0]).unwrap();
    assert_eq!(
        rendered,
        json!({"name": "tmpl", "fullName": "acme/tmpl", "defaultBranch": "main"})
    );
}

#[tokio::test]
async fn test_list_repositories_failure_is_empty() {
    let server = MockServer::start().await;
    mock_get(&server, "/user/repos", 500, json!({"message": "oops"})).await;

    assert!(client_for(&server).list_repositories(TOKEN).await.is_empty());
}

#[tokio::test]
async fn test_list_branches() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/repos/acme/tmpl/branches",
        200,
        json!([{"name": "main"}, {"name": "develop"}]),
    )
    .await;

    let branches = client_for(&server).list_branches(TOKEN, "acme/tmpl").await;
    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main", "develop"]);
}

#[tokio::test]
async fn test_list_branches_unknown_repo_is_empty() {
    let server = MockServer::start().await;
    mock_get(&server, "/repos/acme/missing/branches", 404, json!({"message": "Not Found"})).await;

    assert!(client_for(&server)
        .list_branches(TOKEN, "acme/missing")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_create_repository_sends_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_json(json!({
            "name": "demo-app",
            "description": "A demo",
            "private": true,
            "auto_init": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "full_name": "octocat/demo-app",
            "html_url": "https://github.com/octocat/demo-app",
            "clone_url": "https://github.com/octocat/demo-app.git"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_repository(TOKEN, "demo-app", "A demo", true)
        .await
        .unwrap();

    assert_eq!(created.html_url, "https://github.com/octocat/demo-app");
    assert_eq!(created.clone_url, "https://github.com/octocat/demo-app.git");
    assert_eq!(created.full_name, "octocat/demo-app");
}

#[tokio::test]
async fn test_create_repository_conflict_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Repository creation failed.",
            "errors": [{"message": "name already exists on this account"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client
        .create_repository(TOKEN, "demo-app", "", true)
        .await
        .is_none());

    let err = client
        .try_create_repository(TOKEN, "demo-app", "", true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn test_unconfigured_credential_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mock_create_repo(&server, "octocat", "never").await;

    let client = client_for(&server);
    assert!(client.get_identity("").await.is_none());
    assert!(client
        .list_branches("your_github_personal_access_token_here", "acme/tmpl")
        .await
        .is_empty());
    assert!(client.create_repository("", "never", "", true).await.is_none());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
