use std::fmt;
use std::str::FromStr;

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c {
            '♠' => Some(Suit::Spades),
            '♥' => Some(Suit::Hearts),
            '♦' => Some(Suit::Diamonds),
            '♣' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack value. Aces count as 11 here; hand scoring reduces them to 1
    /// as needed.
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Rank, GameError> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.symbol() == symbol)
            .ok_or_else(|| GameError::InvalidCard(symbol.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn value(self) -> u8 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = GameError;

    /// Parses a `"A♠"` / `"10♦"` style symbol pair. Unknown ranks or suits
    /// are an error, never coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suit_char = s
            .chars()
            .last()
            .ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        let suit =
            Suit::from_char(suit_char).ok_or_else(|| GameError::InvalidCard(s.to_string()))?;
        let rank = Rank::from_symbol(&s[..s.len() - suit_char.len_utf8()])?;
        Ok(Card::new(rank, suit))
    }
}

/// A single 52-card deck. Cards are drawn from the end; `reshuffle` rebuilds
/// the full deck and applies a Fisher-Yates shuffle (`SliceRandom::shuffle`).
pub struct Deck {
    cards: Vec<Card>,
    rng: SmallRng,
}

impl Deck {
    pub fn new(seed: u64) -> Self {
        let mut deck = Deck {
            cards: Vec::with_capacity(52),
            rng: SmallRng::seed_from_u64(seed),
        };
        deck.reshuffle();
        deck
    }

    /// Deck with a predetermined draw order, for scripted rounds. Cards are
    /// drawn from the end of `cards`.
    pub fn fixed(cards: Vec<Card>) -> Self {
        Deck {
            cards,
            rng: SmallRng::seed_from_u64(0),
        }
    }

    pub fn reshuffle(&mut self) {
        self.cards.clear();
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                self.cards.push(Card::new(rank, suit));
            }
        }
        self.cards.shuffle(&mut self.rng);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Remaining cards in draw order; the last card is drawn next.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_deck_has_52_unique_cards() {
        let deck = Deck::new(1);
        assert_eq!(deck.remaining(), 52);
        let unique: HashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_draw_removes_one_card() {
        let mut deck = Deck::new(2);
        let top = *deck.cards().last().unwrap();
        let drawn = deck.draw().unwrap();
        assert_eq!(drawn, top);
        assert_eq!(deck.remaining(), 51);
    }

    #[test]
    fn test_draw_from_empty_deck_fails() {
        let mut deck = Deck::fixed(vec![card("A♠")]);
        assert!(deck.draw().is_ok());
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
    }

    #[test]
    fn test_fixed_deck_draw_order() {
        let mut deck = Deck::fixed(vec![card("2♥"), card("K♦")]);
        assert_eq!(deck.draw().unwrap(), card("K♦"));
        assert_eq!(deck.draw().unwrap(), card("2♥"));
    }

    #[test]
    fn test_reshuffle_restores_full_deck() {
        let mut deck = Deck::new(3);
        for _ in 0..40 {
            deck.draw().unwrap();
        }
        deck.reshuffle();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn test_card_parse_roundtrip() {
        for s in ["A♠", "10♦", "K♣", "7♥"] {
            assert_eq!(card(s).to_string(), s);
        }
    }

    #[test]
    fn test_card_parse_rejects_garbage() {
        assert!("Z♠".parse::<Card>().is_err());
        assert!("A".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
        assert!("11♦".parse::<Card>().is_err());
    }

    #[test]
    fn test_rank_values() {
        assert_eq!(Rank::Ace.value(), 11);
        assert_eq!(Rank::Two.value(), 2);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::Jack.value(), 10);
        assert_eq!(Rank::Queen.value(), 10);
        assert_eq!(Rank::King.value(), 10);
    }

    // A biased shuffle (e.g. a random-comparator sort) leaves cards near
    // their original positions. Check the ace of spades lands everywhere on
    // average, and that the pre-shuffle top card rarely stays on top.
    #[test]
    fn test_shuffle_has_no_positional_bias() {
        let ace = card("A♠");
        let mut position_sum = 0usize;
        let mut top_retained = 0usize;
        let trials = 2000u64;
        for seed in 0..trials {
            let deck = Deck::new(seed);
            position_sum += deck
                .cards()
                .iter()
                .position(|c| *c == ace)
                .expect("ace of spades must be present");
            if *deck.cards().last().unwrap() == card("K♣") {
                top_retained += 1;
            }
        }
        let mean = position_sum as f64 / trials as f64;
        assert!((24.0..=27.0).contains(&mean), "mean position {mean}");
        // Expected around 1/52 of trials (about 38); an identity-leaning
        // shuffle would push this toward 2000.
        assert!(top_retained < 120, "top card retained {top_retained} times");
    }
}
