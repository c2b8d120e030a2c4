use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::phase::{normalize, CanonicalPhase};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Citizens,
    Enemies,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub player: String,
    #[serde(default)]
    pub vote: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundAction {
    pub player: String,
    /// `true` collaborates, `false` sabotages.
    #[serde(default)]
    pub action: bool,
}

/// One decade of a game as reported by the server.
///
/// The server is not consistent about the phase vocabulary, so both `status`
/// and `phase` are kept raw and interpreted through [`Round::canonical_phase`].
/// The creation time may arrive under any of three field names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Round {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub leader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub votes: Vec<Vote>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<RoundAction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: RoundResult,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at_snake: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

/// Explicit `null` reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Round {
    pub fn new(id: impl Into<String>, leader: impl Into<String>) -> Self {
        Round {
            id: id.into(),
            leader: leader.into(),
            status: None,
            phase: None,
            group: Vec::new(),
            votes: Vec::new(),
            actions: Vec::new(),
            result: RoundResult::None,
            created_at: None,
            created_at_snake: None,
            timestamp: None,
        }
    }

    pub fn canonical_phase(&self) -> CanonicalPhase {
        normalize(self.status.as_deref(), self.phase.as_deref())
    }

    /// First non-null creation time among `createdAt`, `created_at`, `timestamp`.
    pub fn creation_time(&self) -> Option<&Value> {
        [&self.created_at, &self.created_at_snake, &self.timestamp]
            .into_iter()
            .flatten()
            .find(|v| !v.is_null())
    }

    pub fn is_leader(&self, player: &str) -> bool {
        self.leader == player
    }

    pub fn in_group(&self, player: &str) -> bool {
        self.group.iter().any(|p| p == player)
    }

    pub fn has_voted(&self, player: &str) -> bool {
        self.votes.iter().any(|v| v.player == player)
    }

    pub fn has_acted(&self, player: &str) -> bool {
        self.actions.iter().any(|a| a.player == player)
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let group = if self.group.is_empty() {
            "none".to_string()
        } else {
            self.group.join(", ")
        };
        write!(
            f,
            "Round: {} | Leader: {} | Status: {} | Phase: {} | Group: {}",
            self.id,
            self.leader,
            self.status.as_deref().unwrap_or("-"),
            self.phase.as_deref().unwrap_or("-"),
            group
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_round_with_nulls_and_unknown_result() {
        let round: Round = serde_json::from_value(json!({
            "id": "r1",
            "leader": "ana",
            "status": "waiting-on-leader",
            "phase": "vote1",
            "group": null,
            "votes": [],
            "result": "draw"
        }))
        .unwrap();

        assert!(round.group.is_empty());
        assert!(round.actions.is_empty());
        assert_eq!(round.result, RoundResult::None);
        assert_eq!(round.canonical_phase(), CanonicalPhase::Proposal);
    }

    #[test]
    fn test_null_leader_and_result_read_as_defaults() {
        let round: Round = serde_json::from_value(json!({
            "id": "r2",
            "leader": null,
            "status": "voting",
            "result": null,
            "actions": null
        }))
        .unwrap();

        assert_eq!(round.leader, "");
        assert_eq!(round.result, RoundResult::None);
        assert!(round.actions.is_empty());
        assert_eq!(round.canonical_phase(), CanonicalPhase::Voting);
    }

    #[test]
    fn test_creation_time_checks_all_field_names() {
        let camel: Round =
            serde_json::from_value(json!({"id": "a", "createdAt": "2024-01-01T00:00:00Z"})).unwrap();
        let snake: Round =
            serde_json::from_value(json!({"id": "b", "created_at": 1700000000000u64})).unwrap();
        let plain: Round =
            serde_json::from_value(json!({"id": "c", "timestamp": "2024-01-01 10:00:00"})).unwrap();
        let none: Round = serde_json::from_value(json!({"id": "d", "createdAt": null})).unwrap();

        assert!(camel.creation_time().is_some());
        assert!(snake.creation_time().is_some());
        assert!(plain.creation_time().is_some());
        assert!(none.creation_time().is_none());
    }

    #[test]
    fn test_votes_and_actions_lookup() {
        let round: Round = serde_json::from_value(json!({
            "id": "r1",
            "leader": "ana",
            "group": ["beto", "caro"],
            "votes": [{"player": "beto", "vote": true}],
            "actions": [{"player": "caro", "action": false}]
        }))
        .unwrap();

        assert!(round.is_leader("ana"));
        assert!(round.in_group("beto"));
        assert!(!round.in_group("ana"));
        assert!(round.has_voted("beto"));
        assert!(!round.has_voted("caro"));
        assert!(round.has_acted("caro"));
        assert!(!round.has_acted("beto"));
    }
}
