use serde::{Deserialize, Serialize};

/// Wrapper every server response comes in. All fields are optional so that a
/// malformed or empty body degrades to `ApiEnvelope::default()`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Default for ApiEnvelope<T> {
    fn default() -> Self {
        Self {
            msg: None,
            data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub name: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreatedGame {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinGameRequest {
    pub player: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposeGroupRequest {
    pub group: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub vote: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: bool,
}

/// Filters for `GET /api/games`. Out of range values are left off the query.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub const MAX_SEARCH_LIMIT: i64 = 50;

impl SearchQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(("status", status.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p >= 0) {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| (0..=MAX_SEARCH_LIMIT).contains(l)) {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Player name and password sent as headers on authenticated calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub player: String,
    pub password: String,
}

impl Credentials {
    pub fn new(player: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            password: password.into(),
        }
    }
}
