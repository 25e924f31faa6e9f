use serde::Serialize;

use crate::deck::{Card, Deck};
use crate::error::GameError;
use crate::hand::{hand_value, is_busted, is_soft_17};
use crate::strategy::{Advice, Advisor};

/// Table rule variants. The default table stands on any 17, including soft
/// 17; the stricter casino rule that hits soft 17 is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableRules {
    pub stand_on_soft_17: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            stand_on_soft_17: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Push,
    Bust,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
            Outcome::Push => "push",
            Outcome::Bust => "bust",
        }
    }

    /// Balance change for a resolved round with the given bet.
    pub fn delta(self, bet: i64) -> i64 {
        match self {
            Outcome::Win => bet,
            Outcome::Lose | Outcome::Bust => -bet,
            Outcome::Push => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    PlayerTurn,
    DealerTurn,
    RoundOver,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub balance: i64,
    pub outcome: Outcome,
}

/// Dealer draw loop: hit below 17, stand at 17 or more. Under
/// `stand_on_soft_17 == false` a soft 17 draws one more card. Deck exhaustion
/// mid-draw is fatal to the round and propagates.
pub fn play_dealer(deck: &mut Deck, hand: &mut Vec<Card>, rules: &TableRules) -> Result<(), GameError> {
    loop {
        let value = hand_value(hand);
        if value >= 17 {
            let hits_soft_17 = !rules.stand_on_soft_17 && is_soft_17(hand);
            if !hits_soft_17 {
                return Ok(());
            }
        }
        hand.push(deck.draw()?);
    }
}

/// Compares finalized hands. The player busting dominates everything else;
/// otherwise a busted dealer or the higher total wins, equal totals push.
pub fn resolve_outcome(player: &[Card], dealer: &[Card]) -> Outcome {
    if is_busted(player) {
        return Outcome::Bust;
    }
    let player_total = hand_value(player);
    let dealer_total = hand_value(dealer);
    if dealer_total > 21 || player_total > dealer_total {
        Outcome::Win
    } else if player_total < dealer_total {
        Outcome::Lose
    } else {
        Outcome::Push
    }
}

/// Serializable view of the table for the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub round: u32,
    pub balance: i64,
    pub bet: i64,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Card>,
    pub player_total: u8,
    pub dealer_total: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<Advice>,
    pub history: Vec<RoundRecord>,
}

/// One player session: deck, hands, balance and round history, mutated only
/// by its own `deal`/`hit`/`stand` transitions.
///
/// A natural two-card 21 plays out under the normal comparison rules; there
/// is no bonus payout.
pub struct GameSession {
    deck: Deck,
    player: Vec<Card>,
    dealer: Vec<Card>,
    bet: i64,
    balance: i64,
    round: u32,
    phase: Phase,
    rules: TableRules,
    advisor: Advisor,
    last_outcome: Option<Outcome>,
    history: Vec<RoundRecord>,
}

impl GameSession {
    pub fn new(starting_balance: i64, bet: i64, seed: u64) -> Result<Self, GameError> {
        if bet <= 0 {
            return Err(GameError::InvalidBet("bet must be positive".to_string()));
        }
        Ok(GameSession {
            deck: Deck::new(seed),
            player: Vec::new(),
            dealer: Vec::new(),
            bet,
            balance: starting_balance,
            round: 1,
            phase: Phase::NotStarted,
            rules: TableRules::default(),
            advisor: Advisor::default(),
            last_outcome: None,
            history: Vec::new(),
        })
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn bet(&self) -> i64 {
        self.bet
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer(&self) -> &[Card] {
        &self.dealer
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn set_advisor(&mut self, advisor: Advisor) {
        self.advisor = advisor;
    }

    /// Bet changes are only allowed between rounds.
    pub fn set_bet(&mut self, bet: i64) -> Result<(), GameError> {
        if self.phase == Phase::PlayerTurn || self.phase == Phase::DealerTurn {
            return Err(GameError::InvalidBet(
                "cannot change bet during a round".to_string(),
            ));
        }
        if bet <= 0 {
            return Err(GameError::InvalidBet("bet must be positive".to_string()));
        }
        self.bet = bet;
        Ok(())
    }

    /// Starts a round from a freshly shuffled deck: two cards each. A no-op
    /// while the player's turn is in progress. Dealing is allowed from
    /// `DealerTurn` so an exhaustion failure mid-round can be recovered.
    pub fn deal(&mut self) -> Result<(), GameError> {
        if self.phase == Phase::PlayerTurn {
            return Ok(());
        }
        self.deck.reshuffle();
        self.player.clear();
        self.dealer.clear();
        self.player.push(self.deck.draw()?);
        self.player.push(self.deck.draw()?);
        self.dealer.push(self.deck.draw()?);
        self.dealer.push(self.deck.draw()?);
        self.last_outcome = None;
        self.phase = Phase::PlayerTurn;
        Ok(())
    }

    /// Draws one card for the player. A bust resolves the round immediately;
    /// the dealer does not draw. No-op outside the player's turn.
    pub fn hit(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurn {
            return Ok(());
        }
        self.player.push(self.deck.draw()?);
        if is_busted(&self.player) {
            self.settle(Outcome::Bust);
        }
        Ok(())
    }

    /// Ends the player's turn: the dealer plays out, then the round settles.
    /// No-op outside the player's turn.
    pub fn stand(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurn {
            return Ok(());
        }
        self.phase = Phase::DealerTurn;
        play_dealer(&mut self.deck, &mut self.dealer, &self.rules)?;
        let outcome = resolve_outcome(&self.player, &self.dealer);
        self.settle(outcome);
        Ok(())
    }

    /// Current recommendation; suppressed once the player has busted or the
    /// round is over.
    pub fn advice(&self) -> Option<Advice> {
        if self.phase != Phase::PlayerTurn || is_busted(&self.player) {
            return None;
        }
        let dealer_up = self.dealer.first()?.value();
        Some(self.advisor.advise(&self.player, dealer_up))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            round: self.round,
            balance: self.balance,
            bet: self.bet,
            player_cards: self.player.clone(),
            dealer_cards: self.dealer.clone(),
            player_total: hand_value(&self.player),
            dealer_total: hand_value(&self.dealer),
            outcome: self.last_outcome,
            advice: self.advice(),
            history: self.history.clone(),
        }
    }

    fn settle(&mut self, outcome: Outcome) {
        self.balance += outcome.delta(self.bet);
        self.history.push(RoundRecord {
            round: self.round,
            balance: self.balance,
            outcome,
        });
        self.last_outcome = Some(outcome);
        self.phase = Phase::RoundOver;
        self.round += 1;
    }
}
