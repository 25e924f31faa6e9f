use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::error::GameError;
use crate::game::{play_dealer, resolve_outcome, Outcome, RoundRecord, TableRules};
use crate::hand::{hand_value, is_busted};

/// Reshuffle the deck between rounds once fewer cards than this remain.
const RESHUFFLE_FLOOR: usize = 15;

/// Default martingale cap, as a multiple of the base bet (six doublings).
const MARTINGALE_CAP: i64 = 64;

fn default_rounds() -> u32 {
    500
}

fn default_starting_balance() -> i64 {
    500
}

fn default_base_bet() -> i64 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BettingPolicy {
    Flat,
    Martingale,
    Random,
}

impl BettingPolicy {
    pub fn from_name(name: &str) -> Result<BettingPolicy, GameError> {
        match name {
            "flat" => Ok(BettingPolicy::Flat),
            "martingale" => Ok(BettingPolicy::Martingale),
            "random" => Ok(BettingPolicy::Random),
            other => Err(GameError::InvalidStrategy(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BettingPolicy::Flat => "flat",
            BettingPolicy::Martingale => "martingale",
            BettingPolicy::Random => "random",
        }
    }

    /// Wager for the next round, as a function of the outcome history. Every
    /// policy is clamped to the remaining balance.
    fn next_bet(
        self,
        base: i64,
        previous: i64,
        last_outcome: Option<Outcome>,
        max_bet: i64,
        balance: i64,
        rng: &mut SmallRng,
    ) -> i64 {
        let bet = match self {
            BettingPolicy::Flat => base,
            BettingPolicy::Martingale => match last_outcome {
                Some(Outcome::Lose) | Some(Outcome::Bust) => (previous * 2).min(max_bet),
                _ => base,
            },
            BettingPolicy::Random => rng.gen_range(base..=base * 3),
        };
        bet.min(balance)
    }
}

#[derive(Debug, Deserialize)]
pub struct SimulationInput {
    pub strategy: String,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
    #[serde(default = "default_base_bet")]
    pub base_bet: i64,
    /// Martingale cap; defaults to 64x the base bet.
    #[serde(default)]
    pub max_bet: Option<i64>,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
pub struct CompareInput {
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
    #[serde(default = "default_base_bet")]
    pub base_bet: i64,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub strategy: BettingPolicy,
    pub samples: Vec<RoundRecord>,
    pub final_balance: i64,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
}

/// Plays one round end to end: two cards each, the player auto-hits below
/// 17, then the dealer plays unless the player already busted.
fn play_round(deck: &mut Deck, rules: &TableRules) -> Result<Outcome, GameError> {
    let mut player = vec![deck.draw()?, deck.draw()?];
    let mut dealer = vec![deck.draw()?, deck.draw()?];
    while hand_value(&player) < 17 {
        player.push(deck.draw()?);
    }
    if is_busted(&player) {
        return Ok(Outcome::Bust);
    }
    play_dealer(deck, &mut dealer, rules)?;
    Ok(resolve_outcome(&player, &dealer))
}

/// Runs the full batch of rounds under one betting policy, recording the
/// balance after every round. The run stops early once the balance reaches
/// zero.
pub fn simulate(input: SimulationInput) -> Result<SimulationResult, GameError> {
    let policy = BettingPolicy::from_name(&input.strategy)?;
    if input.base_bet <= 0 {
        return Err(GameError::InvalidBet("base bet must be positive".to_string()));
    }
    if input.starting_balance <= 0 {
        return Err(GameError::InvalidBet(
            "starting balance must be positive".to_string(),
        ));
    }
    let max_bet = input.max_bet.unwrap_or(input.base_bet * MARTINGALE_CAP);
    let rules = TableRules::default();
    let mut deck = Deck::new(input.seed);
    let mut bet_rng = SmallRng::seed_from_u64(input.seed.wrapping_add(1));

    let mut balance = input.starting_balance;
    let mut previous_bet = input.base_bet;
    let mut last_outcome = None;
    let mut samples = Vec::with_capacity(input.rounds as usize);
    let mut wins = 0;
    let mut losses = 0;
    let mut pushes = 0;

    for round in 1..=input.rounds {
        if deck.remaining() < RESHUFFLE_FLOOR {
            deck.reshuffle();
        }
        let bet = policy.next_bet(
            input.base_bet,
            previous_bet,
            last_outcome,
            max_bet,
            balance,
            &mut bet_rng,
        );
        let outcome = play_round(&mut deck, &rules)?;
        balance += outcome.delta(bet);
        match outcome {
            Outcome::Win => wins += 1,
            Outcome::Lose | Outcome::Bust => losses += 1,
            Outcome::Push => pushes += 1,
        }
        samples.push(RoundRecord {
            round,
            balance,
            outcome,
        });
        previous_bet = bet;
        last_outcome = Some(outcome);
        if balance <= 0 {
            break;
        }
    }

    Ok(SimulationResult {
        strategy: policy,
        samples,
        final_balance: balance,
        wins,
        losses,
        pushes,
    })
}

/// Runs all three betting policies over the same seeded card sequence, so
/// the comparison chart differs only by wager policy.
pub fn compare(input: CompareInput) -> Result<Vec<SimulationResult>, GameError> {
    [
        BettingPolicy::Flat,
        BettingPolicy::Martingale,
        BettingPolicy::Random,
    ]
    .into_iter()
    .map(|policy| {
        simulate(SimulationInput {
            strategy: policy.name().to_string(),
            rounds: input.rounds,
            starting_balance: input.starting_balance,
            base_bet: input.base_bet,
            max_bet: None,
            seed: input.seed,
        })
    })
    .collect()
}
