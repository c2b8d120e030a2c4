use serde::Serialize;

use crate::models::{Game, Round, RoundResult};
use crate::ordering::order_ascending;
use crate::phase::CanonicalPhase;
use crate::rules::{group_size_for, MAX_DECADES, ROUNDS_TO_WIN};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub citizens: usize,
    pub enemies: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Faction {
    Citizens,
    Enemies,
}

impl Score {
    pub fn tally(rounds: &[Round]) -> Self {
        rounds.iter().fold(Score::default(), |mut score, round| {
            match round.result {
                RoundResult::Citizens => score.citizens += 1,
                RoundResult::Enemies => score.enemies += 1,
                RoundResult::None => {}
            }
            score
        })
    }

    pub fn winner(&self) -> Option<Faction> {
        if self.citizens >= ROUNDS_TO_WIN {
            Some(Faction::Citizens)
        } else if self.enemies >= ROUNDS_TO_WIN {
            Some(Faction::Enemies)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }
}

/// Controls the local player may use on the active round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AvailableActions {
    pub propose: bool,
    pub vote: bool,
    pub collaborate: bool,
    pub sabotage: bool,
}

impl AvailableActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.propose || self.vote || self.collaborate || self.sabotage
    }
}

/// Newest round that has not ended, falling back to the newest round.
///
/// `rounds` must already be in ascending order.
pub fn select_active(rounds: &[Round]) -> Option<&Round> {
    rounds
        .iter()
        .rev()
        .find(|r| !r.canonical_phase().is_ended())
        .or_else(|| rounds.last())
}

pub fn available_actions(
    round: &Round,
    phase: &CanonicalPhase,
    player: &str,
    is_enemy: bool,
) -> AvailableActions {
    let mut actions = AvailableActions::none();
    match phase {
        CanonicalPhase::Proposal => {
            actions.propose = round.is_leader(player);
        }
        CanonicalPhase::Voting => {
            actions.vote = !round.has_voted(player);
        }
        CanonicalPhase::Action => {
            if round.in_group(player) && !round.has_acted(player) {
                actions.collaborate = true;
                actions.sabotage = is_enemy;
            }
        }
        _ => {}
    }
    actions
}

/// Everything the client derives from one game + rounds snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    pub rounds: Vec<Round>,
    pub active: Option<Round>,
    pub phase: Option<CanonicalPhase>,
    pub actions: AvailableActions,
    pub score: Score,
    /// Number of rounds played so far, 1-based position of the latest one.
    pub decade: usize,
    pub group_size: Option<usize>,
}

impl Resolution {
    pub fn is_game_over(&self) -> bool {
        self.score.is_game_over()
    }
}

pub fn resolve(game: &Game, rounds: Vec<Round>, player: &str) -> Resolution {
    let rounds = order_ascending(rounds);
    let score = Score::tally(&rounds);
    let decade = rounds.len();
    let group_size = group_size_for(game.player_count(), decade.min(MAX_DECADES));

    let active = select_active(&rounds).cloned();
    let phase = active.as_ref().map(Round::canonical_phase);
    let actions = match (&active, &phase) {
        (Some(round), Some(phase)) if !score.is_game_over() => {
            available_actions(round, phase, player, game.is_enemy(player))
        }
        _ => AvailableActions::none(),
    };

    Resolution {
        rounds,
        active,
        phase,
        actions,
        score,
        decade,
        group_size,
    }
}
