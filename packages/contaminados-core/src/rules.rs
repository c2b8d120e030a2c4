use std::collections::HashSet;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;
pub const MAX_DECADES: usize = 5;
/// Decades a faction must win to end the game.
pub const ROUNDS_TO_WIN: usize = 3;
/// Password header value for games created without one.
pub const NO_PASSWORD: &str = "nopass";
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 20;

// rows: 5..=10 players, columns: decade 1..=5
const GROUP_SIZES: [[usize; MAX_DECADES]; MAX_PLAYERS - MIN_PLAYERS + 1] = [
    [2, 3, 2, 3, 3],
    [2, 3, 4, 3, 4],
    [2, 3, 3, 4, 4],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
    [3, 4, 4, 5, 5],
];

// (citizens, enemies)
const ROLE_SPLITS: [(usize, usize); MAX_PLAYERS - MIN_PLAYERS + 1] =
    [(3, 2), (4, 2), (4, 3), (5, 3), (6, 3), (6, 4)];

/// Required group size for a decade, or `None` when the table has no entry.
pub fn group_size_for(players: usize, decade: usize) -> Option<usize> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) || !(1..=MAX_DECADES).contains(&decade) {
        return None;
    }
    Some(GROUP_SIZES[players - MIN_PLAYERS][decade - 1])
}

pub fn role_split(players: usize) -> Option<(usize, usize)> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return None;
    }
    Some(ROLE_SPLITS[players - MIN_PLAYERS])
}

pub fn can_start_with(players: usize) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&players)
}

/// Length check in characters. An empty value passes when `optional`.
pub fn validate_length(value: &str, min: usize, max: usize, optional: bool) -> bool {
    if optional && value.is_empty() {
        return true;
    }
    let len = value.chars().count();
    len >= min && len <= max
}

pub fn validate_name(value: &str) -> bool {
    validate_length(value, NAME_MIN_LEN, NAME_MAX_LEN, false)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("{required} members are required but {proposed} were proposed")]
    WrongSize { required: usize, proposed: usize },
    #[error("the group contains duplicate names")]
    Duplicates,
    #[error("not players in this game: {}", .0.join(", "))]
    UnknownPlayers(Vec<String>),
}

/// Checks a proposed group against the required size and the game roster.
pub fn validate_group(
    members: &[String],
    required: usize,
    players: &[String],
) -> Result<(), GroupError> {
    if members.len() != required {
        return Err(GroupError::WrongSize {
            required,
            proposed: members.len(),
        });
    }

    let unique: HashSet<&String> = members.iter().collect();
    if unique.len() != members.len() {
        return Err(GroupError::Duplicates);
    }

    let unknown: Vec<String> = members
        .iter()
        .filter(|m| !players.contains(m))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(GroupError::UnknownPlayers(unknown));
    }

    Ok(())
}

/// Splits comma separated names, dropping blanks.
pub fn parse_member_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
