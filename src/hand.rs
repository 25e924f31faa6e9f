use crate::deck::Card;

fn value_and_soft(cards: &[Card]) -> (u8, bool) {
    let mut total = 0u8;
    let mut aces = 0u8;
    for card in cards {
        let value = card.value();
        if value == 11 {
            aces += 1;
        }
        total += value;
    }
    // Downgrade aces from 11 to 1 until the hand fits or no aces remain.
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    (total, aces > 0 && total <= 21)
}

/// Best total of the hand: every ace starts at 11 and is reduced to 1 while
/// the total exceeds 21. Yields the highest non-busting total, or the
/// minimal-overshoot total when the hand is a guaranteed bust.
pub fn hand_value(cards: &[Card]) -> u8 {
    value_and_soft(cards).0
}

/// True when an ace is still counted as 11 in the best total.
pub fn is_soft(cards: &[Card]) -> bool {
    value_and_soft(cards).1
}

pub fn is_busted(cards: &[Card]) -> bool {
    hand_value(cards) > 21
}

/// Natural: exactly two cards totalling 21.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards) == 21
}

/// Soft 17, the total the dealer-policy variants disagree on.
pub fn is_soft_17(cards: &[Card]) -> bool {
    let (value, soft) = value_and_soft(cards);
    value == 17 && soft
}
