use contaminados_core::GroupError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("{message}")]
    ServerError { status: StatusCode, message: String },
    #[error("Response from {0} carried no data")]
    MissingData(String),
}

impl ApiError {
    pub fn server(status: StatusCode, msg: Option<String>) -> Self {
        let message = msg.unwrap_or_else(|| format!("Error ({})", status.as_u16()));
        ApiError::ServerError { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            ApiError::MissingData(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Not connected: enter the server URL first")]
    NotConnected,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No game selected")]
    NoGame,
    #[error("No active round")]
    NoRound,
    #[error("Only the leader ({0}) can propose a group")]
    NotLeader(String),
    #[error("No round is currently voting")]
    NotVoting,
    #[error("Only enemies can sabotage")]
    NotEnemy,
    #[error("The game is over")]
    GameOver,
    #[error("Not allowed right now: {0}")]
    NotAllowed(&'static str),
    #[error("Cannot determine the group size for {players} players in decade {decade}")]
    UnknownGroupSize { players: usize, decade: usize },
    #[error("Invalid group: {0}")]
    Group(#[from] GroupError),
}
