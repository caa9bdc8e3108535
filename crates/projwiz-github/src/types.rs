//! Request and response bodies
//!
//! Responses deserialize from the API's snake_case fields and serialize in
//! camelCase for the local web front-end.

use serde::{Deserialize, Serialize};

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub login: String,
}

/// Repository visible to the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub default_branch: String,
}

/// Branch of a repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Branch {
    pub name: String,
}

/// Body of a create-repository request
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepositoryRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

/// Newly created repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CreatedRepository {
    pub html_url: String,
    pub clone_url: String,
    #[serde(default)]
    pub full_name: String,
}
