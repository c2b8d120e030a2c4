use log::warn;
use serde::{Deserialize, Serialize};

/// The phases the client knows how to render controls for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanonicalPhase {
    Proposal, // leader picks a group
    Voting,   // everyone votes on the group
    Action,   // group members collaborate or sabotage
    Ended,
    Waiting,
    /// Raw lowercased value the server sent that matched nothing above.
    Unrecognized(String),
}

impl CanonicalPhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, CanonicalPhase::Ended)
    }
}

impl std::fmt::Display for CanonicalPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalPhase::Proposal => write!(f, "proposal"),
            CanonicalPhase::Voting => write!(f, "voting"),
            CanonicalPhase::Action => write!(f, "action"),
            CanonicalPhase::Ended => write!(f, "ended"),
            CanonicalPhase::Waiting => write!(f, "waiting"),
            CanonicalPhase::Unrecognized(raw) => write!(f, "unrecognized({})", raw),
        }
    }
}

/// Maps the round `status` and `phase` strings onto a [`CanonicalPhase`].
///
/// The status wins when it is recognised; the phase is only consulted after.
/// Anything left over is returned as [`CanonicalPhase::Unrecognized`] and
/// logged, so a new server vocabulary shows up instead of being misrendered.
pub fn normalize(status: Option<&str>, phase: Option<&str>) -> CanonicalPhase {
    let status = status.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let phase = phase.map(|p| p.trim().to_lowercase()).unwrap_or_default();

    if status.contains("waiting") && status.contains("leader") {
        return CanonicalPhase::Proposal;
    }
    if status == "voting" || status.contains("vote") {
        return CanonicalPhase::Voting;
    }
    if status.contains("waiting") && status.contains("group") {
        return CanonicalPhase::Action;
    }
    if status == "ended" {
        return CanonicalPhase::Ended;
    }

    if phase.starts_with("vote") {
        return CanonicalPhase::Voting;
    }
    if phase.starts_with("propos") {
        return CanonicalPhase::Proposal;
    }
    if phase.starts_with("act") || phase.contains("action") {
        return CanonicalPhase::Action;
    }
    if phase == "ended" {
        return CanonicalPhase::Ended;
    }

    if status.contains("wait") || phase.contains("wait") {
        return CanonicalPhase::Waiting;
    }

    let raw = if status.is_empty() { phase } else { status };
    warn!("Unrecognized round phase from server: {:?}", raw);
    CanonicalPhase::Unrecognized(raw)
}
