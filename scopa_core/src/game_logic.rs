use itertools::Itertools;
use log::{debug, info};

use crate::{
    card::Card,
    error::PlayError,
    game_state::ScopaGame,
    play::PlayOutcome,
    player::PlayerId,
    utils::VecExtensions,
};

impl ScopaGame {
    /// Table positions of every subset whose ranks add up to `card`'s rank,
    /// smallest subsets first and lexicographic by position within a size.
    /// Without any match the only option is the empty one, meaning a discard.
    pub fn capture_positions(card: &Card, table: &[Card]) -> Vec<Vec<usize>> {
        let target = u32::from(card.rank);
        let found = (1..=table.len())
            .flat_map(|size| (0..table.len()).combinations(size))
            .filter(|positions| {
                positions
                    .iter()
                    .map(|&p| u32::from(table[p].rank))
                    .sum::<u32>()
                    == target
            })
            .collect_vec();
        if found.is_empty() {
            vec![vec![]]
        } else {
            found
        }
    }

    pub fn possible_captures(card: &Card, table: &[Card]) -> Vec<Vec<Card>> {
        Self::capture_positions(card, table)
            .into_iter()
            .map(|positions| positions.iter().map(|&p| table[p]).collect())
            .collect()
    }

    /// Capture options the player to move would get by playing `card_index`.
    pub fn capture_options(&self, card_index: usize) -> Result<Vec<Vec<Card>>, PlayError> {
        let card = self.card_in_hand(self.turn, card_index)?;
        Ok(Self::possible_captures(&card, &self.table))
    }

    fn card_in_hand(&self, player: PlayerId, card_index: usize) -> Result<Card, PlayError> {
        let hand = &self.hands[player];
        hand.get(card_index)
            .copied()
            .ok_or(PlayError::InvalidCardIndex {
                index: card_index,
                hand_size: hand.len(),
            })
    }

    pub fn play_card(
        &mut self,
        player: PlayerId,
        card_index: usize,
        capture_index: usize,
    ) -> Result<PlayOutcome, PlayError> {
        if player != self.turn {
            return Err(PlayError::WrongTurn {
                player,
                turn: self.turn,
            });
        }
        let card = self.card_in_hand(player, card_index)?;
        let mut options = Self::capture_positions(&card, &self.table);
        if capture_index >= options.len() {
            return Err(PlayError::InvalidCaptureIndex {
                index: capture_index,
                options: options.len(),
            });
        }
        let chosen = options.swap_remove(capture_index);

        // nothing has been mutated before this point
        let table_size = self.table.len();
        let captured = if chosen.is_empty() {
            None
        } else {
            let cards = self
                .table
                .remove_positions(&chosen)
                .map_err(|position| PlayError::CaptureConsistencyFault {
                    position,
                    table_size,
                })?;
            Some(cards)
        };
        self.hands[player].remove(card_index);

        let mut scopa = false;
        match &captured {
            Some(cards) => {
                self.taken[player].extend(cards.iter().copied());
                self.taken[player].push(card);
                debug!(
                    "player {} captured {} with {}",
                    player,
                    Card::format_cards(cards),
                    card
                );
                if self.table.is_empty() {
                    self.scopa[player] += 1;
                    scopa = true;
                    info!("player {} made a scopa", player);
                }
            }
            None => {
                debug!("player {} discarded {}", player, card);
                self.table.push(card);
            }
        }

        self.turn = ScopaGame::opponent(self.turn);

        let mut redealt = false;
        if self.hands.iter().all(|h| h.is_empty()) {
            if !self.deck.is_empty() {
                self.deal();
                redealt = true;
            } else {
                self.finished = true;
                info!("match finished, {} cards left on the table", self.table.len());
            }
        }

        Ok(PlayOutcome {
            player,
            card,
            captured,
            scopa,
            table: self.table.clone(),
            hands: self.hands.clone(),
            deck_size: self.deck.len(),
            redealt,
            finished: self.is_finished(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        card::{Card, Suit},
        error::PlayError,
        game_state::ScopaGame,
    };

    fn c(rank: u8, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn game_with(
        table: Vec<Card>,
        hand0: Vec<Card>,
        hand1: Vec<Card>,
        deck: Vec<Card>,
    ) -> ScopaGame {
        let mut game = ScopaGame::new();
        game.deck = deck;
        game.table = table;
        game.hands = [hand0, hand1];
        game
    }

    #[test]
    fn matching_single_card_should_be_captured_with_a_scopa() {
        let mut game = game_with(
            vec![c(4, Suit::Coins)],
            vec![c(4, Suit::Swords), c(1, Suit::Cups)],
            vec![c(2, Suit::Cups)],
            vec![c(9, Suit::Cups)],
        );

        let outcome = game.play_card(0, 0, 0).unwrap();

        assert!(game.table().is_empty());
        assert_eq!(game.taken(0), &[c(4, Suit::Coins), c(4, Suit::Swords)]);
        assert_eq!(game.scopa_count(0), 1);
        assert!(outcome.scopa);
        assert_eq!(outcome.captured, Some(vec![c(4, Suit::Coins)]));
        assert_eq!(outcome.card, c(4, Suit::Swords));
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn two_card_sum_should_be_the_first_option_and_clear_the_table() {
        let table = vec![c(2, Suit::Coins), c(3, Suit::Cups)];
        let options = ScopaGame::possible_captures(&c(5, Suit::Swords), &table);
        assert_eq!(options, vec![table.clone()]);

        let mut game = game_with(table, vec![c(5, Suit::Swords)], vec![c(1, Suit::Clubs)], vec![]);
        let outcome = game.play_card(0, 0, 0).unwrap();

        assert!(outcome.scopa);
        assert!(game.table().is_empty());
        assert_eq!(game.scopa_count(0), 1);
        assert_eq!(game.taken(0).len(), 3);
    }

    #[test]
    fn unmatched_card_should_be_discarded_to_the_table() {
        let table = vec![c(9, Suit::Clubs)];
        assert_eq!(
            ScopaGame::possible_captures(&c(4, Suit::Swords), &table),
            vec![Vec::<Card>::new()]
        );

        let mut game = game_with(table, vec![c(4, Suit::Swords)], vec![c(1, Suit::Clubs)], vec![]);
        let outcome = game.play_card(0, 0, 0).unwrap();

        assert_eq!(game.table(), &[c(9, Suit::Clubs), c(4, Suit::Swords)]);
        assert_eq!(outcome.captured, None);
        assert!(!outcome.scopa);
        assert_eq!(game.scopa_count(0), 0);
        assert!(game.taken(0).is_empty());
    }

    #[test]
    fn capture_options_should_list_smaller_subsets_first_in_table_order() {
        let table = vec![
            c(1, Suit::Coins),
            c(6, Suit::Cups),
            c(7, Suit::Swords),
            c(2, Suit::Clubs),
            c(4, Suit::Coins),
        ];
        let options = ScopaGame::capture_positions(&c(7, Suit::Clubs), &table);
        assert_eq!(options, vec![vec![2], vec![0, 1], vec![0, 3, 4]]);
    }

    #[test]
    fn capture_should_not_be_a_scopa_when_cards_remain() {
        let mut game = game_with(
            vec![c(3, Suit::Coins), c(8, Suit::Cups)],
            vec![c(3, Suit::Swords)],
            vec![c(1, Suit::Clubs)],
            vec![],
        );
        let outcome = game.play_card(0, 0, 0).unwrap();
        assert!(!outcome.scopa);
        assert_eq!(game.table(), &[c(8, Suit::Cups)]);
        assert_eq!(game.scopa_count(0), 0);
    }

    #[test]
    fn chosen_capture_index_should_select_the_option() {
        let mut game = game_with(
            vec![c(5, Suit::Coins), c(2, Suit::Cups), c(3, Suit::Clubs)],
            vec![c(5, Suit::Swords)],
            vec![c(1, Suit::Clubs)],
            vec![],
        );
        let outcome = game.play_card(0, 0, 1).unwrap();
        assert_eq!(outcome.captured, Some(vec![c(2, Suit::Cups), c(3, Suit::Clubs)]));
        assert_eq!(game.table(), &[c(5, Suit::Coins)]);
    }

    #[test]
    fn wrong_turn_should_be_rejected_without_changes() {
        let mut game = game_with(
            vec![c(4, Suit::Coins)],
            vec![c(4, Suit::Swords)],
            vec![c(4, Suit::Cups)],
            vec![],
        );
        let before = game.clone();

        assert_eq!(
            game.play_card(1, 0, 0),
            Err(PlayError::WrongTurn { player: 1, turn: 0 })
        );
        assert_eq!(game.all_cards(), before.all_cards());
        assert_eq!(game.hand(1), before.hand(1));
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn bad_indices_should_be_rejected_without_changes() {
        let mut game = game_with(
            vec![c(9, Suit::Coins)],
            vec![c(4, Suit::Swords)],
            vec![c(4, Suit::Cups)],
            vec![],
        );

        assert_eq!(
            game.play_card(0, 3, 0),
            Err(PlayError::InvalidCardIndex { index: 3, hand_size: 1 })
        );
        assert_eq!(
            game.play_card(0, 0, 1),
            Err(PlayError::InvalidCaptureIndex { index: 1, options: 1 })
        );
        assert_eq!(game.hand(0), &[c(4, Suit::Swords)]);
        assert_eq!(game.table(), &[c(9, Suit::Coins)]);
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn emptied_hands_should_be_redealt_from_the_deck() {
        let deck = (1..=6).map(|r| c(r, Suit::Clubs)).collect::<Vec<_>>();
        let mut game = game_with(vec![c(9, Suit::Coins)], vec![], vec![c(8, Suit::Cups)], deck);
        game.turn = 1;

        let outcome = game.play_card(1, 0, 0).unwrap();

        assert!(outcome.redealt);
        assert_eq!(outcome.deck_size, 0);
        assert_eq!(game.hand(0).len(), 3);
        assert_eq!(game.hand(1).len(), 3);
        assert!(!game.is_finished());
    }

    #[test]
    fn match_should_finish_once_the_last_hand_is_played_out() {
        let mut game = game_with(vec![c(9, Suit::Coins)], vec![], vec![c(2, Suit::Cups)], vec![]);
        game.turn = 1;
        assert!(!game.is_finished());

        let outcome = game.play_card(1, 0, 0).unwrap();

        assert!(outcome.finished);
        assert!(game.finished);
        assert!(game.exhausted());
        assert!(game.is_finished());
        assert!(!outcome.redealt);
    }

    #[test]
    fn capture_options_should_follow_the_player_to_move() {
        let game = game_with(
            vec![c(1, Suit::Coins), c(2, Suit::Cups)],
            vec![c(3, Suit::Swords)],
            vec![],
            vec![],
        );
        assert_eq!(
            game.capture_options(0),
            Ok(vec![vec![c(1, Suit::Coins), c(2, Suit::Cups)]])
        );
        assert!(game.capture_options(1).is_err());
    }

    proptest! {
        #[test]
        fn random_matches_should_keep_every_invariant(
            seed in any::<u64>(),
            choices in proptest::collection::vec((any::<u8>(), any::<u8>()), 36),
        ) {
            let mut game = ScopaGame::with_rng(&mut StdRng::seed_from_u64(seed));
            game.setup_match();
            let mut plays = 0;

            while !game.is_finished() {
                let (card_choice, capture_choice) = choices[plays % choices.len()];
                let player = game.turn();
                let hand = game.hand(player).to_vec();
                prop_assert!(!hand.is_empty());
                let card_index = card_choice as usize % hand.len();
                let options = game.capture_options(card_index).unwrap();
                for option in options.iter().filter(|o| !o.is_empty()) {
                    let sum: u32 = option.iter().map(|c| u32::from(c.rank)).sum();
                    prop_assert_eq!(sum, u32::from(hand[card_index].rank));
                }
                let capture_index = capture_choice as usize % options.len();
                let scopa_before = game.scopa_count(player);

                let rejected =
                    game.play_card(ScopaGame::opponent(player), card_index, capture_index);
                prop_assert!(rejected.is_err());
                prop_assert_eq!(game.turn(), player);

                let outcome = game.play_card(player, card_index, capture_index).unwrap();
                plays += 1;

                prop_assert_eq!(game.turn(), ScopaGame::opponent(player));
                let cards = game.all_cards();
                prop_assert_eq!(cards.len(), 40);
                prop_assert_eq!(cards.iter().collect::<HashSet<_>>().len(), 40);
                let cleared = outcome.captured.is_some() && game.table().is_empty();
                prop_assert_eq!(outcome.scopa, cleared);
                prop_assert_eq!(game.scopa_count(player), scopa_before + u32::from(cleared));
                prop_assert_eq!(game.finished, game.exhausted());

                let score = game.compute_score();
                prop_assert_eq!(score, game.compute_score());
            }

            prop_assert_eq!(plays, 36);
            prop_assert!(game.finished);
            prop_assert_eq!(game.deck_size(), 0);
        }
    }
}
