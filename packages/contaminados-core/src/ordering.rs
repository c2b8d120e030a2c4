use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::models::{Round, RoundResult};

const OBJECT_ID_LEN: usize = 24;

/// Parses a creation time into epoch milliseconds. Unparsable values are 0.
pub fn parse_timestamp(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_timestamp_str(s.trim()).unwrap_or(0),
        _ => 0,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    s.parse::<i64>().ok()
}

/// Creation time embedded in the leading 8 hex digits of a 24-hex object id.
pub fn object_id_seconds(id: &str) -> Option<u32> {
    if id.len() != OBJECT_ID_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(&id[..8], 16).ok()
}

fn looks_active(round: &Round) -> bool {
    round.result == RoundResult::None || !round.canonical_phase().is_ended()
}

/// Orders rounds oldest first.
///
/// Timestamps are used when every round has one, then object-id times when
/// every id is one. Otherwise a list that starts active and ends finished is
/// taken to be newest first and reversed.
pub fn order_ascending(mut rounds: Vec<Round>) -> Vec<Round> {
    if rounds.len() < 2 {
        return rounds;
    }

    if rounds.iter().all(|r| r.creation_time().is_some()) {
        rounds.sort_by_key(|r| r.creation_time().map(parse_timestamp).unwrap_or(0));
        return rounds;
    }

    if rounds.iter().all(|r| object_id_seconds(&r.id).is_some()) {
        rounds.sort_by_key(|r| object_id_seconds(&r.id).unwrap_or(0));
        return rounds;
    }

    let first_active = rounds.first().map(looks_active).unwrap_or(false);
    let last_active = rounds.last().map(looks_active).unwrap_or(false);
    if first_active && !last_active {
        rounds.reverse();
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_at(id: &str, created_at: Value) -> Round {
        let mut round = Round::new(id, "ana");
        round.created_at = Some(created_at);
        round
    }

    fn ids(rounds: &[Round]) -> Vec<&str> {
        rounds.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp(&json!("1970-01-01T00:00:01Z")), 1000);
        assert_eq!(parse_timestamp(&json!("1970-01-01 00:00:02")), 2000);
        assert_eq!(parse_timestamp(&json!("1970-01-01T00:00:03.5")), 3500);
        assert_eq!(parse_timestamp(&json!("4000")), 4000);
        assert_eq!(parse_timestamp(&json!(5000)), 5000);
        assert_eq!(parse_timestamp(&json!("yesterday")), 0);
        assert_eq!(parse_timestamp(&json!(true)), 0);
    }

    #[test]
    fn test_sorts_by_timestamp_with_unparsable_first() {
        let rounds = vec![
            round_at("c", json!("2024-05-01T10:02:00Z")),
            round_at("a", json!("2024-05-01T10:00:00Z")),
            round_at("bad", json!("not a date")),
            round_at("b", json!("2024-05-01T10:01:00Z")),
        ];

        assert_eq!(ids(&order_ascending(rounds)), vec!["bad", "a", "b", "c"]);
    }

    #[test]
    fn test_sorts_by_object_id_when_timestamps_missing() {
        let rounds = vec![
            Round::new("65a0000200000000000000aa", "ana"),
            Round::new("65a0000100000000000000ff", "ana"),
            Round::new("65a0000300000000000000bb", "ana"),
        ];

        assert_eq!(
            ids(&order_ascending(rounds)),
            vec![
                "65a0000100000000000000ff",
                "65a0000200000000000000aa",
                "65a0000300000000000000bb"
            ]
        );
    }

    #[test]
    fn test_partial_timestamps_fall_through_to_heuristic() {
        let mut newest = round_at("r3", json!("2024-05-01T10:00:00Z"));
        newest.status = Some("voting".to_string());
        let mut older = Round::new("r2", "ana");
        older.status = Some("ended".to_string());
        older.result = RoundResult::Citizens;
        let mut oldest = Round::new("r1", "ana");
        oldest.status = Some("ended".to_string());
        oldest.result = RoundResult::Enemies;

        let ordered = order_ascending(vec![newest, older, oldest]);
        assert_eq!(ids(&ordered), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_heuristic_keeps_ascending_input() {
        let mut first = Round::new("r1", "ana");
        first.status = Some("ended".to_string());
        first.result = RoundResult::Citizens;
        let mut second = Round::new("r2", "ana");
        second.status = Some("waiting-on-leader".to_string());

        let ordered = order_ascending(vec![first, second]);
        assert_eq!(ids(&ordered), vec!["r1", "r2"]);
    }

    #[test]
    fn test_object_id_rejects_non_hex() {
        assert_eq!(object_id_seconds("65a0000100000000000000ff"), Some(0x65a00001));
        assert_eq!(object_id_seconds("65a00001000000000000zzzz"), None);
        assert_eq!(object_id_seconds("65a00001"), None);
    }
}
