use contaminados_core::{Game, Round};
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::error::ApiError;
use crate::models::{
    ActionRequest, ApiEnvelope, CreateGameRequest, CreatedGame, Credentials, JoinGameRequest,
    ProposeGroupRequest, SearchQuery, VoteRequest,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the ContaminaDOS game server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str, credentials: &Credentials) -> RequestBuilder {
        self.request(method, path)
            .header("player", &credentials.player)
            .header("password", &credentials.password)
    }

    /// Sends the request and decodes the envelope.
    ///
    /// Bodies that are not valid JSON degrade to an empty envelope; a `data`
    /// field of the wrong shape degrades to `None`. Non-2xx statuses become
    /// [`ApiError::ServerError`] carrying the server `msg` when there is one.
    async fn send<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        info!("{} -> {}", label, status);
        debug!("{} body: {}", label, body);

        let raw: ApiEnvelope<Value> = serde_json::from_str(&body).unwrap_or_else(|e| {
            if !body.trim().is_empty() {
                warn!("{}: malformed JSON response ({})", label, e);
            }
            ApiEnvelope::default()
        });

        if !status.is_success() {
            return Err(ApiError::server(status, raw.msg));
        }

        let data = match raw.data {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| warn!("{}: unexpected data shape ({})", label, e))
                .ok(),
            None => None,
        };

        Ok(ApiEnvelope { msg: raw.msg, data })
    }

    pub async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<ApiEnvelope<CreatedGame>, ApiError> {
        let builder = self.request(Method::POST, "/api/games").json(request);
        self.send("POST /api/games", builder).await
    }

    pub async fn search_games(&self, query: &SearchQuery) -> Result<Vec<Game>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/games")
            .query(&query.to_params());
        let envelope: ApiEnvelope<Vec<Game>> = self.send("GET /api/games", builder).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn join_game(
        &self,
        game_id: &str,
        credentials: &Credentials,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let path = format!("/api/games/{}/", game_id);
        let builder = self
            .authed(Method::PUT, &path, credentials)
            .json(&JoinGameRequest {
                player: credentials.player.clone(),
                password: credentials.password.clone(),
            });
        self.send(&format!("PUT {}", path), builder).await
    }

    pub async fn start_game(
        &self,
        game_id: &str,
        credentials: &Credentials,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let path = format!("/api/games/{}/start", game_id);
        let builder = self.authed(Method::HEAD, &path, credentials);
        self.send(&format!("HEAD {}", path), builder).await
    }

    pub async fn get_game(&self, game_id: &str, credentials: &Credentials) -> Result<Game, ApiError> {
        let path = format!("/api/games/{}/", game_id);
        let label = format!("GET {}", path);
        let builder = self.authed(Method::GET, &path, credentials);
        let envelope: ApiEnvelope<Game> = self.send(&label, builder).await?;
        envelope.data.ok_or(ApiError::MissingData(label))
    }

    pub async fn get_rounds(
        &self,
        game_id: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Round>, ApiError> {
        let path = format!("/api/games/{}/rounds", game_id);
        let label = format!("GET {}", path);
        let builder = self.authed(Method::GET, &path, credentials);
        let envelope: ApiEnvelope<Vec<Value>> = self.send(&label, builder).await?;

        // undecodable rounds are skipped, not the whole list
        let rounds = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<Round>(value)
                    .map_err(|e| warn!("{}: skipping malformed round ({})", label, e))
                    .ok()
            })
            .collect();
        Ok(rounds)
    }

    pub async fn propose_group(
        &self,
        game_id: &str,
        round_id: &str,
        credentials: &Credentials,
        group: Vec<String>,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let path = format!("/api/games/{}/rounds/{}", game_id, round_id);
        let builder = self
            .authed(Method::PATCH, &path, credentials)
            .json(&ProposeGroupRequest { group });
        self.send(&format!("PATCH {}", path), builder).await
    }

    pub async fn vote(
        &self,
        game_id: &str,
        round_id: &str,
        credentials: &Credentials,
        vote: bool,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let path = format!("/api/games/{}/rounds/{}", game_id, round_id);
        let builder = self
            .authed(Method::POST, &path, credentials)
            .json(&VoteRequest { vote });
        self.send(&format!("POST {}", path), builder).await
    }

    pub async fn send_action(
        &self,
        game_id: &str,
        round_id: &str,
        credentials: &Credentials,
        action: bool,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let path = format!("/api/games/{}/rounds/{}", game_id, round_id);
        let builder = self
            .authed(Method::PUT, &path, credentials)
            .json(&ActionRequest { action });
        self.send(&format!("PUT {}", path), builder).await
    }
}
