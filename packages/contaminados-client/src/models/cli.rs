use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "contaminados", about = "Terminal client for ContaminaDOS games.")]
pub struct Opt {
    /// session name; each name keeps its own player, game and password
    #[structopt(long)]
    pub session: Option<String>,
    /// directory holding the session files
    #[structopt(long, parse(from_os_str))]
    pub session_dir: Option<PathBuf>,
    /// refresh interval in seconds for watch / auto-refresh
    #[structopt(long)]
    pub interval: Option<u64>,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// bind the session to a game server
    #[structopt(name = "connect")]
    Connect {
        /// server URL, defaults to CONTAMINADOS_SERVER
        url: Option<String>,
    },
    /// create a game and join it as owner
    #[structopt(name = "create")]
    Create {
        #[structopt(long)]
        player: String,
        #[structopt(long)]
        name: String,
        #[structopt(long)]
        password: Option<String>,
    },
    /// list games on the server
    #[structopt(name = "search")]
    Search {
        #[structopt(long)]
        name: Option<String>,
        /// lobby, rounds or ended
        #[structopt(long)]
        status: Option<String>,
        #[structopt(long, default_value = "0")]
        page: i64,
        #[structopt(long, default_value = "50")]
        limit: i64,
    },
    /// join an existing game
    #[structopt(name = "join")]
    Join {
        game_id: String,
        #[structopt(long)]
        player: String,
        /// required when the game has a password
        #[structopt(long)]
        password: Option<String>,
    },
    /// start the current game (owner only)
    #[structopt(name = "start")]
    Start,
    /// refresh and print the current game
    #[structopt(name = "status")]
    Status {
        /// print the view as JSON
        #[structopt(long)]
        json: bool,
    },
    /// propose the group for the current round (leader only)
    #[structopt(name = "propose")]
    Propose {
        /// player names, separated by spaces or commas
        #[structopt(required = true)]
        members: Vec<String>,
    },
    /// vote on the proposed group
    #[structopt(name = "vote")]
    Vote {
        /// yes or no
        choice: VoteChoice,
    },
    /// collaborate in the current round
    #[structopt(name = "collaborate")]
    Collaborate,
    /// sabotage the current round (enemies only)
    #[structopt(name = "sabotage")]
    Sabotage,
    /// toggle auto-refresh for this session
    #[structopt(name = "autorefresh")]
    AutoRefresh,
    /// refresh periodically until the game ends
    #[structopt(name = "watch")]
    Watch,
    /// forget the stored session
    #[structopt(name = "clear-session")]
    ClearSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChoice(pub bool);

impl FromStr for VoteChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "approve" | "true" => Ok(VoteChoice(true)),
            "no" | "n" | "reject" | "false" => Ok(VoteChoice(false)),
            other => Err(format!("expected yes or no, got {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote_and_propose() {
        let opt = Opt::from_iter(&["contaminados", "--session", "tab-2", "vote", "No"]);
        assert_eq!(opt.session.as_deref(), Some("tab-2"));
        assert!(matches!(opt.command, Command::Vote { choice: VoteChoice(false) }));

        let opt = Opt::from_iter(&["contaminados", "propose", "ana,beto", "caro"]);
        match opt.command {
            Command::Propose { members } => assert_eq!(members, vec!["ana,beto", "caro"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_vote_is_rejected() {
        assert!(Opt::from_iter_safe(&["contaminados", "vote", "maybe"]).is_err());
    }
}
