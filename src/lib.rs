use wasm_bindgen::prelude::*;

mod deck;
mod error;
mod game;
mod hand;
mod sim;
mod strategy;

pub use deck::{Card, Deck, Rank, Suit};
pub use error::GameError;
pub use game::{
    play_dealer, resolve_outcome, GameSession, Outcome, Phase, RoundRecord, Snapshot, TableRules,
};
pub use hand::{hand_value, is_blackjack, is_busted, is_soft, is_soft_17};
pub use sim::{compare, simulate, BettingPolicy, CompareInput, SimulationInput, SimulationResult};
pub use strategy::{Action, Advice, Advisor};

/// One blackjack table driven by UI events. Every method returns the full
/// serialized table snapshot for rendering.
#[wasm_bindgen]
pub struct Table {
    session: GameSession,
}

#[wasm_bindgen]
impl Table {
    #[wasm_bindgen(constructor)]
    pub fn new(starting_balance: i64, bet: i64, seed: u64) -> Result<Table, JsValue> {
        console_error_panic_hook::set_once();
        let session = GameSession::new(starting_balance, bet, seed)
            .map_err(|err| JsValue::from_str(&format!("Session error: {err}")))?;
        Ok(Table { session })
    }

    pub fn deal(&mut self) -> Result<JsValue, JsValue> {
        self.session
            .deal()
            .map_err(|err| JsValue::from_str(&format!("Deal failed: {err}")))?;
        self.snapshot()
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        self.session
            .hit()
            .map_err(|err| JsValue::from_str(&format!("Hit failed: {err}")))?;
        self.snapshot()
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        self.session
            .stand()
            .map_err(|err| JsValue::from_str(&format!("Stand failed: {err}")))?;
        self.snapshot()
    }

    pub fn set_bet(&mut self, bet: i64) -> Result<JsValue, JsValue> {
        self.session
            .set_bet(bet)
            .map_err(|err| JsValue::from_str(&format!("Bet rejected: {err}")))?;
        self.snapshot()
    }

    pub fn set_advisor(&mut self, name: &str) -> Result<(), JsValue> {
        let advisor = Advisor::from_name(name)
            .map_err(|err| JsValue::from_str(&format!("Advisor error: {err}")))?;
        self.session.set_advisor(advisor);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.snapshot())
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }
}

#[wasm_bindgen]
pub fn run_simulation(params: &JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let input: SimulationInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let result = sim::simulate(input)
        .map_err(|err| JsValue::from_str(&format!("Simulation failed: {err}")))?;
    web_sys::console::log_1(
        &format!(
            "simulation finished: {} {} rounds, final balance {}",
            result.strategy.name(),
            result.samples.len(),
            result.final_balance
        )
        .into(),
    );

    serde_wasm_bindgen::to_value(&result)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

#[wasm_bindgen]
pub fn compare_strategies(params: &JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let input: CompareInput = serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))?;

    let results = sim::compare(input)
        .map_err(|err| JsValue::from_str(&format!("Comparison failed: {err}")))?;

    serde_wasm_bindgen::to_value(&results)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}
