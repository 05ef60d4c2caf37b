use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use itertools::Itertools;

use scopa_core::{
    card::Card,
    events::{GameEvent, PlayerView},
    game_state::ScopaGame,
    play::{Action, Play, PublicPlay},
    player::{Player, PlayerData},
    score::{PlayerScore, Score},
    utils::SliceExtensions,
};

static RULES: &str = "
*** Scopa ***
Two players, a 40 card Italian deck (ranks 1 to 10 in coins, cups, swords and clubs).
Four cards are laid face up on the table and each player holds three. On your turn play one
card from your hand. If cards on the table add up to its rank you take them together with the
card you played; otherwise the card stays on the table. Taking the last cards from the table is
a scopa and is worth a point. When both hands are empty three new cards are dealt to each player
until the deck runs out.
At the end one point each goes to whoever took more cards, more coins, the seven of coins
(settebello) and the better primiera (best card per suit: 7, 6, ace, 5, 4, 3, 2, then figures).";

#[derive(Debug, PartialEq)]
enum CliAction {
    Quit,
    Rules,
    Choice(usize),
}

#[derive(Debug, PartialEq, Eq)]
struct ParseActionError;

impl CliAction {
    fn info(&self, labels: &[String]) -> String {
        match self {
            CliAction::Quit => "quit".to_string(),
            CliAction::Rules => "display rules".to_string(),
            CliAction::Choice(i) => labels[*i].clone(),
        }
    }

    fn cmd_str(&self) -> String {
        match self {
            CliAction::Quit => "q".to_string(),
            CliAction::Rules => "r".to_string(),
            CliAction::Choice(i) => i.to_string(),
        }
    }
}

impl FromStr for CliAction {
    type Err = ParseActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "q" => Ok(CliAction::Quit),
            "r" => Ok(CliAction::Rules),
            other => usize::from_str(other)
                .map(CliAction::Choice)
                .map_err(|_| ParseActionError),
        }
    }
}

fn describe_capture(option: &[Card]) -> String {
    if option.is_empty() {
        "leave the card on the table".to_string()
    } else {
        format!("take {}", Card::format_cards(option))
    }
}

fn describe_play(play: &PublicPlay, who: &str) -> String {
    let what = match &play.captured {
        Some(cards) => format!(
            "{} played {} and took {}",
            who,
            play.card,
            Card::format_cards(cards)
        ),
        None => format!("{} played {}", who, play.card),
    };
    if play.scopa {
        format!("{} - SCOPA!", what)
    } else {
        what
    }
}

fn score_line(name: &str, score: &PlayerScore) -> String {
    let mut parts = vec![format!("{} scope", score.scope)];
    if score.most_cards {
        parts.push("cards".to_string());
    }
    if score.most_coins {
        parts.push("coins".to_string());
    }
    if score.settebello {
        parts.push("settebello".to_string());
    }
    if score.primiera {
        parts.push(format!("primiera ({})", score.primiera_total));
    }
    format!("{}: {} points [{}]", name, score.points, parts.iter().join(", "))
}

fn seat_label(player: usize) -> String {
    format!("Player {}", player + 1)
}

pub fn print_score(score: &Score, labels: [&str; 2]) {
    println!("================================================");
    for (label, player_score) in labels.iter().zip(score.players.iter()) {
        println!("{}", score_line(label, player_score));
    }
    match score.winner() {
        Some(winner) => println!("{} wins!", labels[winner]),
        None => println!("It's a draw."),
    }
}

pub struct CliPlayer {
    pub data: PlayerData,
    /// Both players share this terminal, so plays are named by seat and
    /// match-wide messages are printed by the first seat only.
    hot_seat: bool,
}

impl CliPlayer {
    fn query_user(&self, cmds: Vec<CliAction>, prompt: &str, labels: &[String]) -> CliAction {
        let mut op = None;
        print!("\n{}\n", prompt);
        while op.is_none() {
            for cmd in &cmds {
                println!("- [{}]: {}", cmd.cmd_str(), cmd.info(labels));
            }
            print!(">");
            let _ = io::stdout().flush();
            match io::stdin().lock().lines().next() {
                Some(Ok(line)) => {
                    op = CliAction::from_str(&line)
                        .ok()
                        .filter(|a| !matches!(a, CliAction::Choice(i) if *i >= labels.len()));
                }
                _ => op = Some(CliAction::Quit),
            }
        }
        op.unwrap_or(CliAction::Quit)
    }

    fn prompt_choice(&self, labels: &[String], prompt: &str) -> CliAction {
        let mut queries = vec![CliAction::Quit, CliAction::Rules];
        queries.extend((0..labels.len()).map(CliAction::Choice));
        self.query_user(queries, prompt, labels)
    }

    fn print_view(&self, view: &PlayerView) {
        println!(
            "~ Table: {}",
            if view.table.is_empty() {
                "(empty)".to_string()
            } else {
                Card::format_cards(&view.table)
            }
        );
        println!(
            "~ Taken: you {} ({} scope), opponent {} ({} scope), {} cards left in deck",
            view.player_taken.len(),
            view.scopa,
            view.opponent_taken.len(),
            view.opponent_scopa,
            view.deck_size
        );
    }
}

impl CliPlayer {
    pub fn new() -> CliPlayer {
        Self::with_seating(false)
    }

    pub fn hot_seat() -> CliPlayer {
        Self::with_seating(true)
    }

    fn with_seating(hot_seat: bool) -> CliPlayer {
        print!("Please Enter Name: ");
        let _ = io::stdout().flush();

        let name = match io::stdin().lock().lines().next() {
            Some(Ok(line)) if !line.trim().is_empty() => line.trim().to_string(),
            _ => "You".to_string(),
        };

        CliPlayer {
            data: PlayerData::new(name),
            hot_seat,
        }
    }

    fn who(&self, player: usize, me: usize) -> String {
        if self.hot_seat {
            seat_label(player)
        } else if player == me {
            "You".to_string()
        } else {
            "Opponent".to_string()
        }
    }

    fn announces(&self, view: &PlayerView) -> bool {
        !self.hot_seat || view.player_index == 0
    }
}

impl Player for CliPlayer {
    fn data(&self) -> &PlayerData {
        &self.data
    }

    fn notify(&self, event: &GameEvent) {
        match event {
            GameEvent::Connected(view) if self.announces(view) => {
                println!("================================================");
                println!("Welcome {}, the match begins.", self.name());
                self.print_view(view);
            }
            GameEvent::StateUpdate { last_play, view } if self.announces(view) => {
                if let Some(play) = last_play {
                    let who = self.who(play.player, view.player_index);
                    println!("~ Play: {}", describe_play(play, &who));
                }
            }
            GameEvent::Rejected(e) => println!("~ Not allowed: {}", e),
            GameEvent::Failed { reason } => println!("~ Match aborted: {}", reason),
            _ => {}
        }
    }

    fn obtain_action(&self, view: &PlayerView) -> Action {
        println!("================================================");
        if self.hot_seat {
            println!("{} ({}) to play", self.name(), seat_label(view.player_index));
        }
        self.print_view(view);

        let hand_labels = view.hand.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let card_index = loop {
            match self.prompt_choice(&hand_labels, "Choose the card you want to play:") {
                CliAction::Quit => return Action::Quit,
                CliAction::Rules => println!("{}", RULES),
                CliAction::Choice(i) => break i,
            }
        };

        let options = ScopaGame::possible_captures(&view.hand[card_index], &view.table);
        if options.single_element().is_some() {
            return Action::Play(Play {
                card_index,
                capture_index: 0,
            });
        }
        let capture_labels = options
            .iter()
            .map(|o| describe_capture(o))
            .collect::<Vec<_>>();
        loop {
            match self.prompt_choice(&capture_labels, "Choose the cards you want to take:") {
                CliAction::Quit => return Action::Quit,
                CliAction::Rules => println!("{}", RULES),
                CliAction::Choice(capture_index) => {
                    return Action::Play(Play {
                        card_index,
                        capture_index,
                    })
                }
            }
        }
    }
}
