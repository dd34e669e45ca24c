//! Cards, the shared deck, and per-player hands.

use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// The effect a card produces when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Bomb,
    Reinforcement,
    Blockade,
    Airlift,
    Diplomacy,
}

/// Every card kind, in deck-building order.
pub const ALL_CARD_KINDS: [CardKind; 5] = [
    CardKind::Bomb,
    CardKind::Reinforcement,
    CardKind::Blockade,
    CardKind::Airlift,
    CardKind::Diplomacy,
];

impl CardKind {
    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Bomb => "Bomb",
            CardKind::Reinforcement => "Reinforcement",
            CardKind::Blockade => "Blockade",
            CardKind::Airlift => "Airlift",
            CardKind::Diplomacy => "Diplomacy",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable card. Identity is its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub kind: CardKind,
}

impl Card {
    pub const fn new(kind: CardKind) -> Self {
        Card { kind }
    }
}

/// The draw pile shared by all players. Draws come off the front; played
/// cards go back on the bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Deck {
            cards: cards.into_iter().collect(),
        }
    }

    /// Builds an unshuffled deck with `copies` of every card kind.
    pub fn standard(copies: usize) -> Self {
        Deck::new(
            ALL_CARD_KINDS
                .iter()
                .flat_map(|&kind| std::iter::repeat(Card::new(kind)).take(copies)),
        )
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::EmptyDeck)
    }

    pub fn put_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The cards a player holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn get(&self, index: usize) -> Result<Card, GameError> {
        self.cards.get(index).copied().ok_or(GameError::IndexOutOfRange {
            index,
            len: self.cards.len(),
        })
    }

    pub fn remove(&mut self, index: usize) -> Result<Card, GameError> {
        if index >= self.cards.len() {
            return Err(GameError::IndexOutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        Ok(self.cards.remove(index))
    }

    /// Index of the first card of the given kind.
    pub fn position(&self, kind: CardKind) -> Option<usize> {
        self.cards.iter().position(|c| c.kind == kind)
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn standard_deck_has_copies_of_each_kind() {
        let deck = Deck::standard(3);
        assert_eq!(deck.len(), 15);
    }

    #[test]
    fn draw_until_empty() {
        let mut deck = Deck::new([Card::new(CardKind::Bomb)]);
        assert_eq!(deck.draw().unwrap().kind, CardKind::Bomb);
        assert!(matches!(deck.draw(), Err(GameError::EmptyDeck)));
    }

    #[test]
    fn shuffle_keeps_contents() {
        let mut deck = Deck::standard(4);
        deck.shuffle(&mut SmallRng::seed_from_u64(7));
        let mut hand = Hand::new();
        while let Ok(card) = deck.draw() {
            hand.add(card);
        }
        for kind in ALL_CARD_KINDS {
            assert_eq!(hand.count(kind), 4);
        }
    }

    #[test]
    fn put_back_goes_to_bottom() {
        let mut deck = Deck::new([Card::new(CardKind::Bomb)]);
        deck.put_back(Card::new(CardKind::Airlift));
        assert_eq!(deck.draw().unwrap().kind, CardKind::Bomb);
        assert_eq!(deck.draw().unwrap().kind, CardKind::Airlift);
    }

    #[test]
    fn hand_access_out_of_range() {
        let mut hand = Hand::new();
        hand.add(Card::new(CardKind::Diplomacy));
        assert!(matches!(hand.get(1), Err(GameError::IndexOutOfRange { index: 1, len: 1 })));
        assert!(hand.remove(4).is_err());
        assert_eq!(hand.len(), 1);
        assert_eq!(hand.remove(0).unwrap().kind, CardKind::Diplomacy);
        assert!(hand.is_empty());
    }

    #[test]
    fn position_finds_first_of_kind() {
        let mut hand = Hand::new();
        hand.add(Card::new(CardKind::Bomb));
        hand.add(Card::new(CardKind::Airlift));
        hand.add(Card::new(CardKind::Airlift));
        assert_eq!(hand.position(CardKind::Airlift), Some(1));
        assert_eq!(hand.position(CardKind::Blockade), None);
    }
}
