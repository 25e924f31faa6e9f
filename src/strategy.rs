use serde::Serialize;

use crate::deck::{Card, Rank};
use crate::error::GameError;
use crate::hand::hand_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Hit,
    Stand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub action: Action,
    /// 0-100.
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bust_probability: Option<f64>,
    pub rationale: String,
}

/// Move recommendation heuristics. Two divergent copies existed upstream, so
/// both are kept as named variants and the caller picks one; the
/// bust-probability estimate is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Advisor {
    Threshold,
    #[default]
    BustProbability,
}

impl Advisor {
    pub fn from_name(name: &str) -> Result<Advisor, GameError> {
        match name {
            "threshold" => Ok(Advisor::Threshold),
            "bust-probability" => Ok(Advisor::BustProbability),
            other => Err(GameError::InvalidStrategy(other.to_string())),
        }
    }

    /// Pure function of the player hand and the dealer's visible card value
    /// (ace up-card counts as 11).
    pub fn advise(self, player: &[Card], dealer_up: u8) -> Advice {
        let total = hand_value(player);
        match self {
            Advisor::Threshold => threshold_advice(total, dealer_up),
            Advisor::BustProbability => bust_probability_advice(total, dealer_up),
        }
    }
}

fn threshold_advice(total: u8, dealer_up: u8) -> Advice {
    let (action, confidence, rationale) = if total <= 11 {
        (
            Action::Hit,
            90,
            format!("A total of {total} cannot bust, always take a card."),
        )
    } else if total >= 17 {
        (
            Action::Stand,
            95,
            format!("Strong total ({total}), drawing risks a bust."),
        )
    } else if dealer_up >= 7 {
        (
            Action::Hit,
            75,
            format!("Dealer shows a strong card ({dealer_up}), you may need to risk a hit."),
        )
    } else {
        (
            Action::Stand,
            75,
            format!("Dealer has a weak card ({dealer_up}), standing may be better."),
        )
    };
    Advice {
        action,
        confidence,
        bust_probability: None,
        rationale,
    }
}

fn bust_probability_advice(total: u8, dealer_up: u8) -> Advice {
    // Each of the 13 ranks is treated as equally likely; cards already out of
    // the deck are deliberately ignored, this is an estimate, not
    // composition-dependent odds.
    let mut busts = 0u32;
    for rank in Rank::ALL {
        let mut value = rank.value();
        if value == 11 && total + 11 > 21 {
            value = 1;
        }
        if total + value > 21 {
            busts += 1;
        }
    }
    let probability = busts as f64 / Rank::ALL.len() as f64 * 100.0;

    let (action, confidence, rationale) = if probability <= 40.0 {
        (
            Action::Hit,
            (100.0 - probability / 2.0).round() as u8,
            format!("Bust probability is low ({probability:.1}%), so it's safe to draw another card."),
        )
    } else if probability >= 60.0 {
        (
            Action::Stand,
            probability.round() as u8,
            format!("High bust probability ({probability:.1}%), standing is safer."),
        )
    } else if dealer_up >= 7 {
        (
            Action::Hit,
            65,
            format!("Dealer shows a strong card ({dealer_up}), you may need to risk a hit."),
        )
    } else {
        (
            Action::Stand,
            70,
            format!("Dealer has a weak card ({dealer_up}), standing may be better."),
        )
    };
    Advice {
        action,
        confidence,
        bust_probability: Some(probability),
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(symbols: &[&str]) -> Vec<Card> {
        symbols.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_threshold_low_total_hits() {
        let advice = Advisor::Threshold.advise(&hand(&["5♥", "6♠"]), 10);
        assert_eq!(advice.action, Action::Hit);
        assert_eq!(advice.confidence, 90);
    }

    #[test]
    fn test_threshold_high_total_stands() {
        let advice = Advisor::Threshold.advise(&hand(&["10♥", "7♠"]), 6);
        assert_eq!(advice.action, Action::Stand);
        assert_eq!(advice.confidence, 95);
    }

    #[test]
    fn test_threshold_middle_band_follows_dealer_card() {
        let strong = Advisor::Threshold.advise(&hand(&["10♥", "4♠"]), 7);
        assert_eq!(strong.action, Action::Hit);
        assert_eq!(strong.confidence, 75);

        let weak = Advisor::Threshold.advise(&hand(&["10♥", "4♠"]), 6);
        assert_eq!(weak.action, Action::Stand);
        assert_eq!(weak.confidence, 75);
    }

    #[test]
    fn test_bust_probability_cannot_bust_at_11() {
        let advice = Advisor::BustProbability.advise(&hand(&["5♥", "6♠"]), 10);
        assert_eq!(advice.action, Action::Hit);
        assert_eq!(advice.bust_probability, Some(0.0));
        assert_eq!(advice.confidence, 100);
    }

    #[test]
    fn test_bust_probability_low_zone_hits() {
        // Total 12: only the four ten-valued ranks bust, 4/13 = 30.8%.
        let advice = Advisor::BustProbability.advise(&hand(&["10♥", "2♠"]), 5);
        assert_eq!(advice.action, Action::Hit);
        let p = advice.bust_probability.unwrap();
        assert!((p - 30.769).abs() < 0.01);
        assert_eq!(advice.confidence, 85);
    }

    #[test]
    fn test_bust_probability_high_zone_stands() {
        // Total 17: ranks 5 through K bust, 9/13 = 69.2%.
        let advice = Advisor::BustProbability.advise(&hand(&["10♥", "7♠"]), 10);
        assert_eq!(advice.action, Action::Stand);
        let p = advice.bust_probability.unwrap();
        assert!((p - 69.230).abs() < 0.01);
        assert_eq!(advice.confidence, 69);
    }

    #[test]
    fn test_bust_probability_middle_band_follows_dealer_card() {
        // Total 14: ranks 8 through K bust, 6/13 = 46.2%, inside the band.
        let strong = Advisor::BustProbability.advise(&hand(&["10♥", "4♠"]), 7);
        assert_eq!(strong.action, Action::Hit);
        assert_eq!(strong.confidence, 65);

        let weak = Advisor::BustProbability.advise(&hand(&["10♥", "4♠"]), 6);
        assert_eq!(weak.action, Action::Stand);
        assert_eq!(weak.confidence, 70);
    }

    #[test]
    fn test_ace_counted_as_one_when_eleven_busts() {
        // Total 12: drawing an ace lands on 13, not a bust.
        let advice = Advisor::BustProbability.advise(&hand(&["10♥", "2♠"]), 5);
        // 4 busting ranks out of 13; if the ace busted it would be 5.
        assert!((advice.bust_probability.unwrap() - 4.0 / 13.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_advisor_from_name() {
        assert_eq!(Advisor::from_name("threshold").unwrap(), Advisor::Threshold);
        assert_eq!(
            Advisor::from_name("bust-probability").unwrap(),
            Advisor::BustProbability
        );
        assert_eq!(
            Advisor::from_name("optimal"),
            Err(GameError::InvalidStrategy("optimal".to_string()))
        );
    }
}
