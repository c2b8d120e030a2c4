use contaminados_core::{Game, NO_PASSWORD};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::Credentials;

pub const SESSION_KEY: &str = "contaminados_session_v1";

/// Key/value storage scoped to one client session.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "session store poisoned"))
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside `<dir>/<session>/`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, session: &str) -> Self {
        Self {
            dir: root.into().join(session),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub server: String,
    pub player: String,
    #[serde(rename = "currentPassword")]
    pub password: String,
    #[serde(rename = "currentGameId")]
    pub game_id: String,
    #[serde(rename = "currentRoundId")]
    pub round_id: String,
    #[serde(rename = "autoOn")]
    pub auto_refresh: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server: String::new(),
            player: String::new(),
            password: NO_PASSWORD.to_string(),
            game_id: String::new(),
            round_id: String::new(),
            auto_refresh: false,
        }
    }
}

impl Session {
    /// Overlays the fields of a stored blob that are present and non-empty.
    fn merge_stored(&mut self, stored: &Value) {
        let text = |field: &str| {
            stored
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(server) = text("server") {
            self.server = server;
        }
        if let Some(player) = text("player") {
            self.player = player;
        }
        if let Some(password) = text("currentPassword") {
            self.password = password;
        }
        if let Some(game_id) = text("currentGameId") {
            self.game_id = game_id;
        }
        if let Some(round_id) = text("currentRoundId") {
            self.round_id = round_id;
        }
        if let Some(auto) = stored.get("autoOn").and_then(Value::as_bool) {
            self.auto_refresh = auto;
        }
    }
}

/// Session state plus the store it is mirrored to on every mutation.
pub struct SessionContext {
    session: Session,
    last_game: Option<Game>,
    store: Box<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            session: Session::default(),
            last_game: None,
            store,
        }
    }

    /// Builds a context and restores whatever the store holds.
    pub fn restore(store: Box<dyn SessionStore>) -> Self {
        let mut ctx = Self::new(store);
        match ctx.store.load(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(stored) if stored.is_object() => ctx.session.merge_stored(&stored),
                Ok(_) => warn!("Ignoring stored session: not an object"),
                Err(e) => warn!("Could not restore session: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Could not read session store: {}", e),
        }
        ctx
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_game(&self) -> Option<&Game> {
        self.last_game.as_ref()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.session.player.clone(), self.session.password.clone())
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.session)
            .map_err(io::Error::from)
            .and_then(|raw| self.store.save(SESSION_KEY, &raw));
        if let Err(e) = result {
            warn!("Could not save session: {}", e);
        }
    }

    pub fn set_server(&mut self, server: &str) {
        self.session.server = server.to_string();
        self.persist();
    }

    pub fn set_player(&mut self, player: &str) {
        self.session.player = player.to_string();
        self.persist();
    }

    pub fn set_password(&mut self, password: &str) {
        self.session.password = password.to_string();
        self.persist();
    }

    pub fn set_game_id(&mut self, game_id: &str) {
        self.session.game_id = game_id.to_string();
        self.persist();
    }

    pub fn set_round_id(&mut self, round_id: &str) {
        self.session.round_id = round_id.to_string();
        self.persist();
    }

    /// Cached in memory only.
    pub fn set_last_game(&mut self, game: Option<Game>) {
        self.last_game = game;
    }

    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.session.auto_refresh = !self.session.auto_refresh;
        self.persist();
        self.session.auto_refresh
    }

    /// Drops the stored entry and resets to defaults.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!("Could not clear session: {}", e);
        }
        self.session = Session::default();
        self.last_game = None;
    }
}
