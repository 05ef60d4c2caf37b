use clap::Parser;
use cli_player::CliPlayer;
use scopa_core::{run_game, run_match};

mod cli_player;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Scopa in the terminal", long_about = None)]
struct Args {
    /// Two people take turns at this terminal instead of playing the computer
    #[arg(long)]
    hot_seat: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let (score, labels) = if args.hot_seat {
        (
            run_match(CliPlayer::hot_seat, CliPlayer::hot_seat),
            ["Player 1", "Player 2"],
        )
    } else {
        (run_game(CliPlayer::new), ["You", "Computer"])
    };

    match score {
        Some(score) => cli_player::print_score(&score, labels),
        None => println!("Match abandoned."),
    }
}
