use contaminados_core::{
    group_size_for, normalize, object_id_seconds, order_ascending, parse_timestamp, resolve,
    CanonicalPhase, Faction, Game, GameStatus, Round, RoundResult,
};
use serde_json::json;

fn game(players: &[&str], enemies: Option<&[&str]>) -> Game {
    Game {
        id: "g1".to_string(),
        name: "contaminados".to_string(),
        owner: players[0].to_string(),
        status: GameStatus::Rounds,
        players: players.iter().map(|p| p.to_string()).collect(),
        enemies: enemies.map(|e| e.iter().map(|p| p.to_string()).collect()),
        password: false,
    }
}

fn round(id: &str, status: &str, result: RoundResult) -> Round {
    let mut r = Round::new(id, "ana");
    r.status = Some(status.to_string());
    r.result = result;
    r
}

/// Every rotation and its reverse, enough to shake out order dependence.
fn reorderings(rounds: &[Round]) -> Vec<Vec<Round>> {
    let mut out = Vec::new();
    for shift in 0..rounds.len() {
        let mut rotated = rounds.to_vec();
        rotated.rotate_left(shift);
        out.push(rotated.clone());
        rotated.reverse();
        out.push(rotated);
    }
    out
}

#[test]
fn test_timestamp_order_is_non_decreasing_for_any_input_order() {
    let stamps = [
        json!("2024-03-01T12:00:05Z"),
        json!("2024-03-01T12:00:01Z"),
        json!(1709294400000i64),
        json!("2024-03-01 12:00:03"),
        json!("2024-03-01T12:00:01Z"),
    ];
    let rounds: Vec<Round> = stamps
        .iter()
        .enumerate()
        .map(|(i, stamp)| {
            let mut r = Round::new(format!("round-{}", i), "ana");
            if i % 2 == 0 {
                r.created_at = Some(stamp.clone());
            } else {
                r.timestamp = Some(stamp.clone());
            }
            r
        })
        .collect();

    for input in reorderings(&rounds) {
        let ordered = order_ascending(input);
        let times: Vec<i64> = ordered
            .iter()
            .map(|r| parse_timestamp(r.creation_time().unwrap()))
            .collect();
        assert!(
            times.windows(2).all(|w| w[0] <= w[1]),
            "not ascending: {:?}",
            times
        );
    }
}

#[test]
fn test_object_id_order_matches_decoded_prefix() {
    let rounds: Vec<Round> = [
        "663a1f0000000000000000c3",
        "663a1e0000000000000000a1",
        "663a200000000000000000b2",
        "663a1f8000000000000000d4",
    ]
    .iter()
    .map(|id| Round::new(*id, "ana"))
    .collect();

    for input in reorderings(&rounds) {
        let ordered = order_ascending(input);
        let decoded: Vec<u32> = ordered
            .iter()
            .map(|r| object_id_seconds(&r.id).unwrap())
            .collect();
        let mut expected = decoded.clone();
        expected.sort();
        assert_eq!(decoded, expected);
    }
}

#[test]
fn test_normalize_examples() {
    assert_eq!(
        normalize(Some("waiting-on-leader"), Some("anything")),
        CanonicalPhase::Proposal
    );
    assert_eq!(normalize(Some("vote2"), None), CanonicalPhase::Voting);
    assert_eq!(normalize(None, Some("vote2")), CanonicalPhase::Voting);
    assert_eq!(normalize(None, Some("ended")), CanonicalPhase::Ended);
    assert_eq!(normalize(Some("ended"), None), CanonicalPhase::Ended);
}

#[test]
fn test_group_size_examples() {
    assert_eq!(group_size_for(7, 3), Some(3));
    assert_eq!(group_size_for(4, 1), None);
}

#[test]
fn test_three_citizen_wins_end_the_game() {
    let g = game(&["ana", "beto", "caro", "dani", "eli"], Some(&["dani", "eli"]));
    let rounds = vec![
        round("r1", "ended", RoundResult::Citizens),
        round("r2", "ended", RoundResult::Enemies),
        round("r3", "ended", RoundResult::Citizens),
        round("r4", "ended", RoundResult::Citizens),
    ];

    let resolution = resolve(&g, rounds, "ana");

    assert_eq!(resolution.score.citizens, 3);
    assert_eq!(resolution.score.enemies, 1);
    assert!(resolution.is_game_over());
    assert_eq!(resolution.score.winner(), Some(Faction::Citizens));
    assert!(!resolution.actions.any());
    assert_eq!(resolution.active.map(|r| r.id), Some("r4".to_string()));
}

#[test]
fn test_active_round_is_voting_round_before_ended_tail() {
    let g = game(&["ana", "beto", "caro", "dani", "eli"], None);
    let mut voting = round("r1", "voting", RoundResult::None);
    voting.group = vec!["ana".to_string(), "beto".to_string()];
    let mut rounds = vec![
        round("r0", "ended", RoundResult::Enemies),
        voting,
        round("r2", "ended", RoundResult::Citizens),
        round("r3", "ended", RoundResult::Enemies),
    ];
    for (i, r) in rounds.iter_mut().enumerate() {
        r.created_at = Some(json!(1_700_000_000_000i64 + i as i64 * 60_000));
    }
    rounds.reverse();

    let resolution = resolve(&g, rounds, "caro");

    let active = resolution.active.as_ref().unwrap();
    assert_eq!(active.id, "r1");
    assert_eq!(resolution.phase, Some(CanonicalPhase::Voting));
    assert!(resolution.actions.vote);
}

#[test]
fn test_resolve_newest_first_input() {
    let g = game(&["ana", "beto", "caro", "dani", "eli", "fede", "gabi"], None);
    let mut current = round("r3", "waiting-on-leader", RoundResult::None);
    current.leader = "gabi".to_string();
    let rounds = vec![
        current,
        round("r2", "ended", RoundResult::Enemies),
        round("r1", "ended", RoundResult::Citizens),
    ];

    let resolution = resolve(&g, rounds, "gabi");

    let ids: Vec<&str> = resolution.rounds.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
    assert_eq!(resolution.decade, 3);
    assert_eq!(resolution.group_size, Some(3));
    assert!(resolution.actions.propose);
    assert!(!resolution.is_game_over());
}

#[test]
fn test_resolve_without_rounds() {
    let g = game(&["ana", "beto", "caro", "dani", "eli"], None);
    let resolution = resolve(&g, Vec::new(), "ana");

    assert!(resolution.active.is_none());
    assert!(resolution.phase.is_none());
    assert_eq!(resolution.decade, 0);
    assert_eq!(resolution.group_size, None);
    assert!(!resolution.actions.any());
}
