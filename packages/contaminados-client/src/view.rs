use contaminados_core::{
    can_start_with, role_split, AvailableActions, CanonicalPhase, Faction, Game, GameStatus,
    Resolution, Score, MAX_PLAYERS,
};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoleInfo {
    pub is_enemy: bool,
    /// (citizens, enemies) for this player count.
    pub totals: Option<(usize, usize)>,
    /// Other enemies, only known to an enemy.
    pub other_enemies: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveRoundView {
    pub round_id: String,
    pub summary: String,
    pub decade: usize,
    pub phase: CanonicalPhase,
    pub score: Score,
    pub group_size: Option<usize>,
    pub player_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RoundSection {
    /// Game not started yet.
    Hidden,
    /// Started but the server has no rounds yet.
    Empty,
    Active(ActiveRoundView),
}

/// Everything the terminal prints for one refresh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameView {
    pub player: String,
    pub game_name: String,
    pub players: Vec<String>,
    pub status: GameStatus,
    pub role: Option<RoleInfo>,
    pub show_start: bool,
    pub start_enabled: bool,
    pub rounds: RoundSection,
    pub actions: AvailableActions,
    pub winner: Option<Faction>,
}

impl GameView {
    pub fn build(game: &Game, resolution: Option<&Resolution>, player: &str) -> Self {
        let started = game.status.has_rounds();
        let is_owner = game.is_owner(player);

        let role = match (&game.enemies, started) {
            (Some(_), true) => {
                let is_enemy = game.is_enemy(player);
                Some(RoleInfo {
                    is_enemy,
                    totals: role_split(game.player_count()),
                    other_enemies: is_enemy.then(|| game.other_enemies(player)),
                })
            }
            _ => None,
        };

        let rounds = match (started, resolution) {
            (false, _) => RoundSection::Hidden,
            (true, None) => RoundSection::Empty,
            (true, Some(res)) => match (&res.active, &res.phase) {
                (Some(active), Some(phase)) => RoundSection::Active(ActiveRoundView {
                    round_id: active.id.clone(),
                    summary: active.to_string(),
                    decade: res.decade,
                    phase: phase.clone(),
                    score: res.score,
                    group_size: res.group_size,
                    player_count: game.player_count(),
                }),
                _ => RoundSection::Empty,
            },
        };

        let (actions, winner) = match (started, resolution) {
            (true, Some(res)) => (res.actions, res.score.winner()),
            _ => (AvailableActions::none(), None),
        };

        GameView {
            player: player.to_string(),
            game_name: game.name.clone(),
            players: game.players.clone(),
            status: game.status.clone(),
            role,
            show_start: is_owner,
            start_enabled: is_owner
                && can_start_with(game.player_count())
                && game.status == GameStatus::Lobby,
            rounds,
            actions,
            winner,
        }
    }

    /// Once a faction has won only start, search and auto-refresh stay usable.
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }
}

/// One row of the search results.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameListing {
    pub id: String,
    pub name: String,
    pub status: GameStatus,
    pub player_count: usize,
    pub requires_password: bool,
    pub is_full: bool,
}

impl From<&Game> for GameListing {
    fn from(game: &Game) -> Self {
        let player_count = game.player_count();
        GameListing {
            id: game.id.clone(),
            name: game.name.clone(),
            status: game.status.clone(),
            player_count,
            requires_password: game.password,
            is_full: player_count >= MAX_PLAYERS,
        }
    }
}

impl fmt::Display for GameListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = if self.is_full {
            format!("FULL ({})", self.player_count)
        } else if self.requires_password {
            "join (password)".to_string()
        } else {
            "join".to_string()
        };
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.id, self.name, self.player_count, self.status, join
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game: {} | Players: {} | Status: {}",
            self.game_name,
            self.players.join(", "),
            self.status
        )?;
        if let Some(role) = &self.role {
            write!(
                f,
                " | Role: {}",
                if role.is_enemy { "Enemy" } else { "Citizen" }
            )?;
            if let Some((citizens, enemies)) = role.totals {
                write!(f, " | Total roles: C={} / E={}", citizens, enemies)?;
            }
        }
        match self.winner {
            Some(Faction::Citizens) => write!(f, " | Winner: the citizens won the game!")?,
            Some(Faction::Enemies) => write!(f, " | Winner: the enemies won the game!")?,
            None => {}
        }
        writeln!(f)?;

        if let Some(others) = self.role.as_ref().and_then(|r| r.other_enemies.as_ref()) {
            if others.is_empty() {
                writeln!(f, "You are an enemy (no other enemies known)")?;
            } else {
                writeln!(f, "Other enemies: {}", others.join(", "))?;
            }
        }

        if self.show_start {
            writeln!(f, "Start available: {}", yes_no(self.start_enabled))?;
        }

        match &self.rounds {
            RoundSection::Hidden => {}
            RoundSection::Empty => {
                writeln!(f, "No active rounds yet.")?;
                writeln!(f, "Decade: 0 | Phase: - | Score: citizens 0, enemies 0")?;
            }
            RoundSection::Active(round) => {
                writeln!(f, "{}", round.summary)?;
                writeln!(
                    f,
                    "Decade: {} | Phase: {} | Score: citizens {}, enemies {}",
                    round.decade, round.phase, round.score.citizens, round.score.enemies
                )?;
                match round.group_size {
                    Some(size) => writeln!(
                        f,
                        "Required group size: {} (players: {})",
                        size, round.player_count
                    )?,
                    None => writeln!(
                        f,
                        "Required group size: - (players: {})",
                        round.player_count
                    )?,
                }
            }
        }

        if !self.is_game_over() && self.actions.any() {
            let mut available = Vec::new();
            if self.actions.propose {
                available.push("propose");
            }
            if self.actions.vote {
                available.push("vote");
            }
            if self.actions.collaborate {
                available.push("collaborate");
            }
            if self.actions.sabotage {
                available.push("sabotage");
            }
            writeln!(f, "Your move: {}", available.join(" | "))?;
        }
        Ok(())
    }
}
