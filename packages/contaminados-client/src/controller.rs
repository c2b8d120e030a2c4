use contaminados_core::{
    parse_member_list, resolve, validate_group, validate_length, validate_name, CanonicalPhase,
    Game, Resolution, Round, NAME_MAX_LEN, NAME_MIN_LEN, NO_PASSWORD,
};
use log::{info, warn};
use std::time::Duration;
use tokio::time::sleep;

use crate::api_client::{ApiClient, DEFAULT_TIMEOUT};
use crate::error::{ApiError, ClientError};
use crate::models::{CreateGameRequest, SearchQuery, MAX_SEARCH_LIMIT};
use crate::session::SessionContext;
use crate::view::{GameListing, GameView};

/// Pause between a successful start and the first refresh, so the server
/// has created the first round.
const START_SETTLE: Duration = Duration::from_millis(500);

/// Search pages scanned when looking a game up before joining.
const JOIN_LOOKUP_PAGES: i64 = 10;

/// Result of a user action: the message to show and the refreshed view.
#[derive(Debug)]
pub struct Outcome {
    pub message: String,
    pub view: Option<GameView>,
}

impl Outcome {
    fn new(message: impl Into<String>, view: Option<GameView>) -> Self {
        Self {
            message: message.into(),
            view,
        }
    }
}

/// Drives the game from the local player's point of view.
pub struct GameController {
    session: SessionContext,
    api: Option<ApiClient>,
    http_timeout: Duration,
}

impl GameController {
    pub fn new(session: SessionContext) -> Self {
        Self::with_timeout(session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(session: SessionContext, http_timeout: Duration) -> Self {
        let server = session.session().server.clone();
        let api = if server.is_empty() {
            None
        } else {
            ApiClient::with_timeout(&server, http_timeout)
                .map_err(|e| warn!("Could not build client for {}: {}", server, e))
                .ok()
        };
        Self {
            session,
            api,
            http_timeout,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    fn api(&self) -> Result<ApiClient, ClientError> {
        self.api.clone().ok_or(ClientError::NotConnected)
    }

    fn game_id(&self) -> Result<String, ClientError> {
        let game_id = self.session.session().game_id.clone();
        if game_id.is_empty() {
            return Err(ClientError::NoGame);
        }
        Ok(game_id)
    }

    fn player(&self) -> String {
        self.session.session().player.clone()
    }

    pub fn connect(&mut self, url: &str) -> Result<Outcome, ClientError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::Validation("enter the server URL".to_string()));
        }

        let api = ApiClient::with_timeout(url, self.http_timeout)?;
        self.session.set_server(api.base_url());
        self.api = Some(api);

        info!("Connected to {}", url);
        Ok(Outcome::new(format!("Connected to: {}", url), None))
    }

    pub async fn create_game(
        &mut self,
        player: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let api = self.api()?;
        let player = player.trim();
        let name = name.trim();
        let password = password.map(str::trim).unwrap_or_default();

        self.session.set_player(player);

        if !validate_name(player)
            || !validate_name(name)
            || !validate_length(password, NAME_MIN_LEN, NAME_MAX_LEN, true)
        {
            return Err(ClientError::Validation(format!(
                "player and game name must be {min}-{max} characters, password {min}-{max} (optional)",
                min = NAME_MIN_LEN,
                max = NAME_MAX_LEN
            )));
        }

        let request = CreateGameRequest {
            name: name.to_string(),
            owner: player.to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
        };
        let envelope = api.create_game(&request).await?;
        let created = envelope
            .data
            .ok_or_else(|| ApiError::MissingData("POST /api/games".to_string()))?;

        self.session.set_game_id(&created.id);
        self.session
            .set_password(if password.is_empty() { NO_PASSWORD } else { password });

        let view = self.refresh_logged().await;
        Ok(Outcome::new(
            envelope.msg.unwrap_or_else(|| "Game created.".to_string()),
            view,
        ))
    }

    pub async fn search_games(&self, query: &SearchQuery) -> Result<Vec<GameListing>, ClientError> {
        let games = self.api()?.search_games(query).await?;
        Ok(games.iter().map(GameListing::from).collect())
    }

    /// Joins `game_id`. A supplied password must be 3-20 characters; without
    /// one the "nopass" sentinel is sent.
    pub async fn join_game(
        &mut self,
        game_id: &str,
        player: &str,
        password: Option<&str>,
    ) -> Result<Outcome, ClientError> {
        let api = self.api()?;
        let game_id = game_id.trim();
        let player = player.trim();

        self.session.set_player(player);
        if !validate_name(player) {
            return Err(ClientError::Validation(format!(
                "player name must be {}-{} characters",
                NAME_MIN_LEN, NAME_MAX_LEN
            )));
        }
        if game_id.is_empty() {
            return Err(ClientError::NoGame);
        }

        let password = match password.map(str::trim) {
            Some(p) if validate_name(p) => p.to_string(),
            Some(_) => {
                return Err(ClientError::Validation(format!(
                    "password must be {}-{} characters",
                    NAME_MIN_LEN, NAME_MAX_LEN
                )))
            }
            None => NO_PASSWORD.to_string(),
        };

        match self.find_listing(&api, game_id).await {
            Ok(Some(listing)) if listing.is_full => {
                return Err(ClientError::Validation("game is full".to_string()))
            }
            Ok(Some(_)) => {}
            Ok(None) => warn!("Game {} not found in search results, joining anyway", game_id),
            Err(e) => warn!("Could not check capacity of {}: {}", game_id, e),
        }

        self.session.set_password(&password);

        let envelope = api
            .join_game(game_id, &self.session.credentials())
            .await?;
        self.session.set_game_id(game_id);

        let view = self.refresh_logged().await;
        Ok(Outcome::new(
            envelope
                .msg
                .unwrap_or_else(|| "Joined the game.".to_string()),
            view,
        ))
    }

    /// Scans the search pages for `game_id`; `None` when it is not listed.
    async fn find_listing(
        &self,
        api: &ApiClient,
        game_id: &str,
    ) -> Result<Option<GameListing>, ApiError> {
        for page in 0..JOIN_LOOKUP_PAGES {
            let query = SearchQuery {
                page: Some(page),
                limit: Some(MAX_SEARCH_LIMIT),
                ..SearchQuery::default()
            };
            let games = api.search_games(&query).await?;
            if let Some(game) = games.iter().find(|g| g.id == game_id) {
                return Ok(Some(GameListing::from(game)));
            }
            if (games.len() as i64) < MAX_SEARCH_LIMIT {
                break;
            }
        }
        Ok(None)
    }

    pub async fn start_game(&mut self) -> Result<Outcome, ClientError> {
        let game_id = self.game_id()?;
        let api = self.api()?;

        let started = api.start_game(&game_id, &self.session.credentials()).await;
        if started.is_ok() {
            sleep(START_SETTLE).await;
        }
        let view = self.refresh_logged().await;

        started?;
        Ok(Outcome::new("Game started", view))
    }

    /// Fetches the game and then its rounds and rebuilds the view.
    ///
    /// On any failure nothing in the session changes.
    pub async fn refresh(&mut self) -> Result<GameView, ClientError> {
        let game_id = self.game_id()?;
        let api = self.api()?;
        let credentials = self.session.credentials();
        let player = self.player();

        let game = api.get_game(&game_id, &credentials).await?;

        if !game.status.has_rounds() {
            self.session.set_last_game(Some(game.clone()));
            self.session.set_round_id("");
            return Ok(GameView::build(&game, None, &player));
        }

        let rounds = api.get_rounds(&game_id, &credentials).await?;
        self.session.set_last_game(Some(game.clone()));
        let resolution = self.apply_rounds(&game, rounds, &player);

        Ok(GameView::build(&game, Some(&resolution), &player))
    }

    /// [`GameController::refresh`] with failures logged instead of returned.
    pub async fn refresh_logged(&mut self) -> Option<GameView> {
        match self.refresh().await {
            Ok(view) => Some(view),
            Err(e) => {
                warn!("Refresh skipped: {}", e);
                None
            }
        }
    }

    fn apply_rounds(&mut self, game: &Game, rounds: Vec<Round>, player: &str) -> Resolution {
        let resolution = resolve(game, rounds, player);
        let round_id = resolution
            .active
            .as_ref()
            .map(|r| r.id.clone())
            .unwrap_or_default();
        self.session.set_round_id(&round_id);

        if resolution.is_game_over() {
            info!(
                "Game finished: citizens {}, enemies {}",
                resolution.score.citizens, resolution.score.enemies
            );
        }
        resolution
    }

    /// Fresh game + rounds, used before every round action.
    async fn snapshot(&mut self) -> Result<(String, Game, Resolution), ClientError> {
        let game_id = self.game_id()?;
        let api = self.api()?;
        let credentials = self.session.credentials();
        let player = self.player();

        let game = api.get_game(&game_id, &credentials).await?;
        let rounds = api.get_rounds(&game_id, &credentials).await?;
        self.session.set_last_game(Some(game.clone()));
        let resolution = self.apply_rounds(&game, rounds, &player);
        Ok((game_id, game, resolution))
    }

    pub async fn propose_group(&mut self, members: Vec<String>) -> Result<Outcome, ClientError> {
        let (game_id, game, resolution) = self.snapshot().await?;
        let player = self.player();

        if resolution.is_game_over() {
            return Err(ClientError::GameOver);
        }
        let round = resolution.active.as_ref().ok_or(ClientError::NoRound)?;
        if !round.is_leader(&player) {
            return Err(ClientError::NotLeader(round.leader.clone()));
        }
        if !resolution.actions.propose {
            return Err(ClientError::NotAllowed("the round is not waiting for a proposal"));
        }
        let required = resolution
            .group_size
            .ok_or(ClientError::UnknownGroupSize {
                players: game.player_count(),
                decade: resolution.decade,
            })?;
        validate_group(&members, required, &game.players)?;

        info!("Proposing group: {:?}", members);
        let envelope = self
            .api()?
            .propose_group(&game_id, &round.id, &self.session.credentials(), members)
            .await?;

        let view = self.refresh_logged().await;
        Ok(Outcome::new(
            envelope
                .msg
                .unwrap_or_else(|| "Group proposed.".to_string()),
            view,
        ))
    }

    /// Like [`GameController::propose_group`] with comma separated names.
    pub async fn propose_group_from(&mut self, input: &str) -> Result<Outcome, ClientError> {
        self.propose_group(parse_member_list(input)).await
    }

    pub async fn vote(&mut self, approve: bool) -> Result<Outcome, ClientError> {
        let (game_id, _, resolution) = self.snapshot().await?;

        if resolution.is_game_over() {
            return Err(ClientError::GameOver);
        }
        let round = match (&resolution.active, &resolution.phase) {
            (Some(round), Some(CanonicalPhase::Voting)) => round,
            _ => return Err(ClientError::NotVoting),
        };
        if !resolution.actions.vote {
            return Err(ClientError::NotAllowed("you already voted in this round"));
        }

        let envelope = self
            .api()?
            .vote(&game_id, &round.id, &self.session.credentials(), approve)
            .await?;

        let view = self.refresh_logged().await;
        Ok(Outcome::new(
            envelope.msg.unwrap_or_else(|| "Vote registered".to_string()),
            view,
        ))
    }

    /// `true` collaborates, `false` sabotages. Only enemies may sabotage.
    pub async fn send_action(&mut self, collaborate: bool) -> Result<Outcome, ClientError> {
        let (game_id, game, resolution) = self.snapshot().await?;
        let player = self.player();

        if resolution.is_game_over() {
            return Err(ClientError::GameOver);
        }
        let round = resolution.active.as_ref().ok_or(ClientError::NoRound)?;
        if !collaborate && !game.is_enemy(&player) {
            return Err(ClientError::NotEnemy);
        }
        let allowed = if collaborate {
            resolution.actions.collaborate
        } else {
            resolution.actions.sabotage
        };
        if !allowed {
            return Err(ClientError::NotAllowed(
                "no action is expected from you in this round",
            ));
        }

        let envelope = self
            .api()?
            .send_action(&game_id, &round.id, &self.session.credentials(), collaborate)
            .await?;

        let view = self.refresh_logged().await;
        Ok(Outcome::new(
            envelope.msg.unwrap_or_else(|| "Action sent".to_string()),
            view,
        ))
    }

    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.session.toggle_auto_refresh()
    }
}
