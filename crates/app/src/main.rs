//! Blitz - trivia session client
//!
//! Command-line client for the Blitz backend: browse topics and public
//! games, author or generate question sets, and host or join live
//! sessions.

use std::io::BufRead;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blitz_core::{Difficulty, GameCode};

mod api;
mod cache;
mod config;
mod coordinator;
mod error;
mod lobby;
mod messages;
mod network;

use api::ApiClient;
use config::Config;
use coordinator::CommitCoordinator;
use error::{Error, Result};
use lobby::{LobbyChange, LobbyController};
use network::SocketManager;

/// Environment variable carrying the auth provider's id token
const ENV_ID_TOKEN: &str = "BLITZ_ID_TOKEN";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["topics"] => list_topics(&config).await,
        ["games"] => list_games(&config).await,
        ["join", code, uid] => join_game(&config, code, uid, uid).await,
        ["join", code, uid, name] => join_game(&config, code, uid, name).await,
        ["play", topic, difficulty, count, uid] => {
            play(&config, topic, difficulty, count, uid, uid).await
        }
        ["play", topic, difficulty, count, uid, name] => {
            play(&config, topic, difficulty, count, uid, name).await
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("Uso:");
    println!("  blitz topics");
    println!("  blitz games");
    println!("  blitz join <CÓDIGO> <UID> [NOMBRE]");
    println!("  blitz play <tema> <dificultad> <cantidad> <UID> [NOMBRE]");
}

fn id_token() -> Option<String> {
    std::env::var(ENV_ID_TOKEN)
        .ok()
        .filter(|t| !t.trim().is_empty())
}

async fn list_topics(config: &Config) -> Result<()> {
    let api = ApiClient::new(config.api_base.clone())?;
    let topics = api.fetch_topics().await?;
    let levels = api.fetch_difficulty_levels().await?;

    println!("Temas disponibles:");
    for topic in topics {
        println!("  {}", topic);
    }
    println!("Niveles de dificultad: {}", levels.join(", "));
    Ok(())
}

async fn list_games(config: &Config) -> Result<()> {
    let api = ApiClient::new(config.api_base.clone())?;
    let games = api.fetch_public_games().await?;

    if games.is_empty() {
        println!("No hay partidas públicas en este momento.");
        return Ok(());
    }
    println!("Partidas públicas:");
    for game in games {
        println!(
            "  {}  anfitrión: {}  jugadores: {}",
            game.id,
            game.host_name().unwrap_or("?"),
            game.players.len()
        );
    }
    Ok(())
}

/// Generate a question set, commit it, create the session and host it
async fn play(
    config: &Config,
    topic: &str,
    difficulty: &str,
    count: &str,
    uid: &str,
    name: &str,
) -> Result<()> {
    let difficulty = Difficulty::parse(difficulty)
        .ok_or_else(|| Error::Config(format!("unknown difficulty '{}'", difficulty)))?;
    let count: usize = count
        .parse()
        .map_err(|_| Error::Config(format!("invalid question count '{}'", count)))?;
    let token = id_token();

    let api = ApiClient::new(config.api_base.clone())?;
    println!("Generando {} preguntas sobre {}...", count, topic);
    let records = api
        .generate_questions(topic, difficulty, count, true, token.as_deref())
        .await?;

    let mut coordinator = CommitCoordinator::new(api, topic, difficulty, uid);
    coordinator
        .commit_generated(records, token.as_deref())
        .await?;
    println!("Preguntas guardadas: {}", coordinator.batch().len());

    let event = coordinator.create_game_event(name, true, token.as_deref())?;
    let mut manager = SocketManager::new(config.socket_addr);
    let (code, accepted) = match manager.create_game(event).await {
        Ok(outcome) => outcome,
        Err(e) => {
            coordinator.creation_failed();
            return Err(e);
        }
    };
    coordinator.creation_confirmed();
    println!("Partida creada: {} ({} preguntas)", code, accepted);

    host_lobby(manager, code, uid, name).await
}

/// Join an existing session as a guest
async fn join_game(config: &Config, code: &str, uid: &str, name: &str) -> Result<()> {
    let code = GameCode::parse(code)?;
    let manager = SocketManager::new(config.socket_addr);
    host_lobby(manager, code, uid, name).await
}

/// Run the lobby until the game starts, faults, or the user leaves
///
/// The host types `start` to begin; anyone types `salir` to leave.
async fn host_lobby(manager: SocketManager, code: GameCode, uid: &str, name: &str) -> Result<()> {
    let mut controller = LobbyController::join(manager, code.clone(), uid, name).await?;
    println!("En la sala {}. Esperando jugadores...", code);

    let mut input = stdin_lines();
    loop {
        tokio::select! {
            change = controller.next_change() => {
                match change? {
                    Some(LobbyChange::RosterUpdated) => {
                        let lobby = controller.lobby();
                        println!("Jugadores ({}):", lobby.players().len());
                        for player in lobby.players() {
                            let tag = if Some(player.uid.as_str()) == lobby.host_uid() {
                                " (anfitrión)"
                            } else {
                                ""
                            };
                            println!("  {}{}", player.name(), tag);
                        }
                        if lobby.can_start() {
                            println!("Escribe 'start' para iniciar la partida.");
                        }
                    }
                    Some(LobbyChange::Started) => {
                        println!("¡La partida ha comenzado!");
                        break;
                    }
                    Some(LobbyChange::Errored(message)) => {
                        println!("{}", message);
                        break;
                    }
                    None => {
                        println!("{}", messages::CONNECTION_ERROR);
                        break;
                    }
                }
            }
            line = input.recv() => {
                match line.as_deref().map(str::trim) {
                    Some("start") => {
                        if let Err(e) = controller.start().await {
                            println!("{}", e.user_message());
                        }
                    }
                    Some("salir") | None => break,
                    Some(_) => println!("Comandos: start, salir"),
                }
            }
        }
    }

    controller.leave().await;
    Ok(())
}

/// Stdin as a line channel, readable from within `select!`
fn stdin_lines() -> tokio::sync::mpsc::Receiver<String> {
    let (tx, rx) = tokio::sync::mpsc::channel(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
