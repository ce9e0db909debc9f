mod config;
mod input;

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use ttt_common::games::tictactoe::{COMPUTER, GameSession, GameStatus, MoveReport};
use ttt_common::storage::FileStateStore;
use ttt_common::{log, logger};

use config::get_config_manager;
use input::{ClientCommand, parse_command};

#[derive(Parser)]
#[command(name = "ttt_client", about = "Play tic-tac-toe against the computer")]
struct Args {
    /// Config file; defaults to ttt_client_config.yaml next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the state file from the config.
    #[arg(long)]
    state_file: Option<PathBuf>,
    #[arg(long)]
    use_log_prefix: bool,
}

fn result_message(status: GameStatus) -> Option<&'static str> {
    match status {
        GameStatus::XWon => Some("You have won the game! :)"),
        GameStatus::OWon => Some("You have lost the game! :("),
        GameStatus::Draw => Some("Draw!"),
        GameStatus::InProgress => None,
    }
}

fn announce(report: &MoveReport) {
    if let Some(message) = result_message(report.status) {
        println!("{}", message);
    }
}

fn print_board(session: &GameSession<FileStateStore>) {
    println!();
    print!("{}", session.board());
    println!();
    if session.is_inactive() {
        println!("Enter r to play again or q to quit.");
    } else {
        println!("Your move (1-9), r to reset, q to quit:");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = get_config_manager(args.config).get_config()?;

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, config.log_file.as_deref().map(Path::new))?;

    let state_file = args
        .state_file
        .unwrap_or_else(|| PathBuf::from(&config.state_file));
    log!("Using state file {}", state_file.display());

    let mut session = GameSession::load(FileStateStore::new(state_file))?;
    let think_delay = config.game.think_delay();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if !session.is_inactive() && session.current_player() == COMPUTER {
            print!("{}", session.board());
            println!("Computer is thinking...");
            tokio::time::sleep(think_delay).await;
            let report = session.computer_move()?;
            println!("Computer took cell {}.", report.index + 1);
            announce(&report);
        }

        print_board(&session);

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(ClientCommand::Quit) => break,
            Ok(ClientCommand::Reset) => session.reset()?,
            Ok(ClientCommand::Place(index)) => match session.player_move(index) {
                Ok(report) => announce(&report),
                Err(e) => println!("{}", e),
            },
            Err(e) => println!("{}", e),
        }
    }

    log!("Client exiting");
    Ok(())
}
