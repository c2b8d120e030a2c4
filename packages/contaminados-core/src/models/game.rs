use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Lobby,    // waiting for players
    Started,  // roles assigned, first round pending
    Rounds,   // rounds in progress
    Ended,
    #[serde(other)]
    Unknown,
}

impl GameStatus {
    /// Both "started" and "rounds" mean the round section is live.
    pub fn is_started(&self) -> bool {
        matches!(self, GameStatus::Started | GameStatus::Rounds)
    }

    /// Live games plus ended ones, whose rounds stay visible as history.
    pub fn has_rounds(&self) -> bool {
        self.is_started() || *self == GameStatus::Ended
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Lobby => write!(f, "lobby"),
            GameStatus::Started => write!(f, "started"),
            GameStatus::Rounds => write!(f, "rounds"),
            GameStatus::Ended => write!(f, "ended"),
            GameStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    pub status: GameStatus,
    #[serde(default)]
    pub players: Vec<String>,
    // only revealed to enemies once the game has started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies: Option<Vec<String>>,
    #[serde(default)]
    pub password: bool,
}

impl Game {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_owner(&self, player: &str) -> bool {
        self.owner == player
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }

    pub fn is_enemy(&self, player: &str) -> bool {
        self.enemies
            .as_ref()
            .map(|enemies| enemies.iter().any(|e| e == player))
            .unwrap_or(false)
    }

    /// Enemies other than `player`, for the enemy's own view.
    pub fn other_enemies(&self, player: &str) -> Vec<String> {
        self.enemies
            .iter()
            .flatten()
            .filter(|e| *e != player)
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game {{ id: {}, name: {}, owner: {}, status: {}, players: {:?} }}",
            self.id, self.name, self.owner, self.status, self.players
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_lobby_game_without_enemies() {
        let game: Game = serde_json::from_value(json!({
            "id": "g1",
            "name": "night shift",
            "owner": "ana",
            "status": "lobby",
            "players": ["ana", "beto"],
            "password": true
        }))
        .unwrap();

        assert_eq!(game.status, GameStatus::Lobby);
        assert!(game.password);
        assert!(game.enemies.is_none());
        assert!(!game.is_enemy("ana"));
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let game: Game = serde_json::from_value(json!({
            "id": "g1",
            "name": "x",
            "status": "paused"
        }))
        .unwrap();

        assert_eq!(game.status, GameStatus::Unknown);
        assert!(!game.status.is_started());
        assert!(game.players.is_empty());
        assert!(!game.password);
    }

    #[test]
    fn test_other_enemies_excludes_self() {
        let game: Game = serde_json::from_value(json!({
            "id": "g1",
            "name": "x",
            "owner": "ana",
            "status": "rounds",
            "players": ["ana", "beto", "caro", "dani", "eli"],
            "enemies": ["beto", "eli"]
        }))
        .unwrap();

        assert!(game.status.is_started());
        assert!(game.status.has_rounds());
        assert!(game.is_enemy("eli"));
        assert_eq!(game.other_enemies("eli"), vec!["beto".to_string()]);
    }
}
