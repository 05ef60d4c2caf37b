use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    card::{Card, Suit},
    game_state::{ScopaGame, PLAYER_COUNT},
    player::PlayerId,
};

/// How a player's points were made up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub scope: u32,
    pub most_cards: bool,
    pub most_coins: bool,
    pub settebello: bool,
    pub primiera: bool,
    pub primiera_total: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub players: [PlayerScore; PLAYER_COUNT],
}

impl Score {
    pub fn points(&self) -> [u32; PLAYER_COUNT] {
        [self.players[0].points, self.players[1].points]
    }

    /// `None` on a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        let [a, b] = self.points();
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Sum over suits of the best primiera value taken in that suit.
pub fn primiera_total(taken: &[Card]) -> u32 {
    Suit::iter()
        .filter_map(|suit| {
            taken
                .iter()
                .filter(|c| c.suit == suit)
                .map(Card::primiera_value)
                .max()
        })
        .sum()
}

fn coins(taken: &[Card]) -> usize {
    taken.iter().filter(|c| c.suit == Suit::Coins).count()
}

impl ScopaGame {
    /// Scores the taken piles as they are now. Can be called mid-match.
    pub fn compute_score(&self) -> Score {
        let mut score = Score::default();
        for (player, entry) in score.players.iter_mut().enumerate() {
            let mine = &self.taken[player];
            let theirs = &self.taken[ScopaGame::opponent(player)];
            let primiera = primiera_total(mine);

            entry.scope = self.scopa[player];
            entry.most_cards = mine.len() > theirs.len();
            entry.most_coins = coins(mine) > coins(theirs);
            entry.settebello = mine.iter().any(Card::is_settebello);
            entry.primiera = primiera > primiera_total(theirs);
            entry.primiera_total = primiera;
            entry.points = entry.scope
                + [
                    entry.most_cards,
                    entry.most_coins,
                    entry.settebello,
                    entry.primiera,
                ]
                .iter()
                .map(|&won| u32::from(won))
                .sum::<u32>();
        }
        score
    }
}
