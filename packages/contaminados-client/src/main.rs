use anyhow::Result;
use dotenvy::dotenv;
use env_logger::Builder;
use log::{warn, LevelFilter};
use std::sync::Arc;
use std::time::Duration;
use structopt::StructOpt;
use tokio::sync::Mutex;

use contaminados_client::{
    ClientConfig, Command, FileStore, GameController, Opt, Outcome, PollControl, Poller,
    SearchQuery, SessionContext,
};

fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .parse_default_env()
        .init();
}

fn print_outcome(outcome: &Outcome) {
    println!("{}", outcome.message);
    if let Some(view) = &outcome.view {
        print!("{}", view);
    }
}

/// Refreshes every `period` until the game is over or Ctrl-C.
async fn watch(controller: GameController, period: Duration) -> Result<()> {
    let controller = Arc::new(Mutex::new(controller));

    {
        let mut c = controller.lock().await;
        let view = c.refresh().await?;
        print!("{}", view);
        if view.is_game_over() {
            return Ok(());
        }
    }

    let mut poller = Poller::new();
    let shared = controller.clone();
    poller.start(period, move || {
        let shared = shared.clone();
        async move {
            let mut c = shared.lock().await;
            match c.refresh().await {
                Ok(view) => {
                    print!("\n{}", view);
                    if view.is_game_over() {
                        PollControl::Stop
                    } else {
                        PollControl::Continue
                    }
                }
                Err(e) => {
                    warn!("Refresh skipped: {}", e);
                    PollControl::Continue
                }
            }
        }
    });

    let interrupted = tokio::select! {
        _ = poller.join() => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        poller.stop();
    }
    Ok(())
}

async fn follow_up(controller: GameController, period: Duration) -> Result<()> {
    if controller.session().session().auto_refresh {
        watch(controller, period).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenv() {
        eprintln!("Warning: could not load .env: {}", e);
    }
    init_logger();

    let opt = Opt::from_args();
    let mut config = ClientConfig::from_env();
    if let Some(session) = opt.session {
        config.session_name = session;
    }
    if let Some(dir) = opt.session_dir {
        config.session_dir = dir;
    }
    if let Some(secs) = opt.interval.filter(|s| *s > 0) {
        config.poll_interval = Duration::from_secs(secs);
    }

    let store = FileStore::new(&config.session_dir, &config.session_name);
    let session = SessionContext::restore(Box::new(store));
    let mut controller = GameController::with_timeout(session, config.http_timeout);

    if controller.session().session().server.is_empty() {
        if let Some(server) = &config.server {
            controller.connect(server)?;
        }
    }

    match opt.command {
        Command::Connect { url } => {
            let url = url.or(config.server.clone()).unwrap_or_default();
            print_outcome(&controller.connect(&url)?);
        }
        Command::Create {
            player,
            name,
            password,
        } => {
            let outcome = controller
                .create_game(&player, &name, password.as_deref())
                .await?;
            print_outcome(&outcome);
            follow_up(controller, config.poll_interval).await?;
        }
        Command::Search {
            name,
            status,
            page,
            limit,
        } => {
            let query = SearchQuery {
                name,
                status,
                page: Some(page),
                limit: Some(limit),
            };
            let listings = controller.search_games(&query).await?;
            if listings.is_empty() {
                println!("No games found.");
            }
            for listing in listings {
                println!("{}", listing);
            }
        }
        Command::Join {
            game_id,
            player,
            password,
        } => {
            let outcome = controller
                .join_game(&game_id, &player, password.as_deref())
                .await?;
            print_outcome(&outcome);
            follow_up(controller, config.poll_interval).await?;
        }
        Command::Start => {
            let outcome = controller.start_game().await?;
            print_outcome(&outcome);
            follow_up(controller, config.poll_interval).await?;
        }
        Command::Status { json } => {
            let view = controller.refresh().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", view);
            }
        }
        Command::Propose { members } => {
            let outcome = controller.propose_group_from(&members.join(",")).await?;
            print_outcome(&outcome);
        }
        Command::Vote { choice } => {
            print_outcome(&controller.vote(choice.0).await?);
        }
        Command::Collaborate => {
            print_outcome(&controller.send_action(true).await?);
        }
        Command::Sabotage => {
            print_outcome(&controller.send_action(false).await?);
        }
        Command::AutoRefresh => {
            let on = controller.toggle_auto_refresh();
            println!("Auto-refresh: {}", if on { "On" } else { "Off" });
            if on && !controller.session().session().game_id.is_empty() {
                watch(controller, config.poll_interval).await?;
            }
        }
        Command::Watch => {
            watch(controller, config.poll_interval).await?;
        }
        Command::ClearSession => {
            controller.session_mut().clear();
            println!("Session cleared.");
        }
    }

    Ok(())
}
