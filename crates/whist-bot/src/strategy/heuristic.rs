use super::{PlayerView, StrategyError};
use tracing::{Level, event};
use whist_core::model::card::Card;
use whist_core::model::hand::Hand;
use whist_core::model::rank::Rank;
use whist_core::model::trump::Trump;

/// Weights for turning a hand into an expected trick count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicParams {
    pub trump_multiplier: f64,
    pub card_multiplier: f64,
    /// Non-trump cards at or below this rank count for nothing.
    pub card_cutoff: u8,
}

impl Default for HeuristicParams {
    /// Best values found against random opponents.
    fn default() -> Self {
        Self {
            trump_multiplier: 1.05,
            card_multiplier: 0.35,
            card_cutoff: 6,
        }
    }
}

/// Bids from a weighted hand score, then plays to land exactly on its contract.
#[derive(Debug, Clone, Default)]
pub struct HeuristicStrategy {
    params: HeuristicParams,
}

impl HeuristicStrategy {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HeuristicParams {
        &self.params
    }

    pub fn evaluate_hand(&self, hand: &Hand, trump: Trump) -> f64 {
        let total: f64 = hand
            .iter()
            .map(|&card| {
                let rank = f64::from(card.rank.value());
                if trump.is_trump(card) {
                    rank * self.params.trump_multiplier
                } else if card.rank.value() > self.params.card_cutoff {
                    rank * self.params.card_multiplier
                } else {
                    0.0
                }
            })
            .sum();
        total / 10.0
    }

    pub(crate) fn make_bid(&self, view: &PlayerView, options: &[u8]) -> Result<u8, StrategyError> {
        let score = self.evaluate_hand(view.hand, view.trump);
        let bid = choose_bid(score, options).ok_or(StrategyError::NoOptions)?;
        event!(
            target: "whist_bot::bid",
            Level::DEBUG,
            seat = view.seat.index(),
            score,
            bid,
            options = ?options
        );
        Ok(bid)
    }

    /// Picks from `legal`, the seat's legal-play set; empty sets are an error.
    pub(crate) fn play_card(&self, view: &PlayerView, legal: &[Card]) -> Result<Card, StrategyError> {
        let (card, reason) = choose_play(view, legal).ok_or(StrategyError::NoLegalPlay)?;
        log_play_decision(view, legal, card, reason);
        Ok(card)
    }
}

/// Nearest legal bid to `score`; ties go to the earlier option.
fn choose_bid(score: f64, options: &[u8]) -> Option<u8> {
    let max = options.iter().copied().max()?;
    let rounded = score.round_ties_even();
    if let Some(&exact) = options.iter().find(|&&option| f64::from(option) == rounded) {
        return Some(exact);
    }
    if rounded > f64::from(max) {
        return Some(max);
    }
    options
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (score - f64::from(*a)).abs();
            let db = (score - f64::from(*b)).abs();
            da.total_cmp(&db)
        })
}

fn choose_play(view: &PlayerView, legal: &[Card]) -> Option<(Card, &'static str)> {
    if let [only] = legal {
        return Some((*only, "only_legal"));
    }

    if view.contract == Some(view.trick_count) {
        if view.is_leading() {
            return lowest_rank(legal).map(|card| (card, "lose_lead_low"));
        }
        let mut by_value = legal.to_vec();
        by_value.sort_by_key(|card| value_key(*card, view.trump));
        by_value.reverse();
        if let Some(card) = by_value
            .iter()
            .copied()
            .find(|card| !view.trick.would_win(*card, view.trump))
        {
            return Some((card, "lose_highest_safe"));
        }
        return by_value.last().map(|card| (*card, "lose_forced_win"));
    }

    if view.is_leading() {
        return highest_rank(legal).map(|card| (card, "win_lead_high"));
    }
    if let Some(card) = legal
        .iter()
        .copied()
        .filter(|card| view.trick.beats_all(*card, view.trump))
        .max_by_key(|card| value_key(*card, view.trump))
    {
        return Some((card, "win_highest_winner"));
    }
    lowest_rank(legal).map(|card| (card, "win_impossible_discard"))
}

/// Non-trumps by rank, then trumps by rank.
fn value_key(card: Card, trump: Trump) -> (bool, Rank) {
    (trump.is_trump(card), card.rank)
}

/// Lowest raw rank, suit ignored; earliest in hand order on ties.
fn lowest_rank(cards: &[Card]) -> Option<Card> {
    cards.iter().copied().min_by_key(|card| card.rank)
}

/// Highest raw rank, suit ignored; earliest in hand order on ties.
fn highest_rank(cards: &[Card]) -> Option<Card> {
    cards.iter().rev().copied().max_by_key(|card| card.rank)
}

fn log_play_decision(view: &PlayerView, legal: &[Card], chosen: Card, reason: &str) {
    if !tracing::enabled!(target: "whist_bot::play", Level::DEBUG) {
        return;
    }

    let legal_preview = legal
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "whist_bot::play",
        Level::DEBUG,
        seat = view.seat.index(),
        contract = ?view.contract,
        trick_count = view.trick_count,
        legal_moves = %legal_preview,
        chosen = %chosen,
        trick_cards = view.trick.len(),
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use whist_core::model::player::PlayerId;
    use whist_core::model::suit::Suit;
    use whist_core::model::trick::Trick;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn trick_of(cards: &[Card]) -> Trick {
        let mut trick = Trick::new(4);
        for (seat, card) in cards.iter().enumerate() {
            trick.add_card(PlayerId::new(seat as u8 + 1), *card).unwrap();
        }
        trick
    }

    fn view<'a>(
        hand: &'a Hand,
        trick: &'a Trick,
        trump: Trump,
        contract: u8,
        trick_count: u8,
    ) -> PlayerView<'a> {
        PlayerView {
            seat: PlayerId::new(0),
            hand,
            trick,
            trump,
            contract: Some(contract),
            trick_count,
            cards_seen: &[],
        }
    }

    fn play(hand: &Hand, trick: &Trick, trump: Trump, contract: u8, won: u8) -> Card {
        let view = view(hand, trick, trump, contract, won);
        let legal = view.legal_plays();
        HeuristicStrategy::default().play_card(&view, &legal).unwrap()
    }

    #[test]
    fn evaluates_trumps_and_high_side_cards() {
        let hand = Hand::with_cards(vec![
            c(Rank::Ace, Suit::Club),
            c(Rank::Nine, Suit::Diamond),
            c(Rank::Two, Suit::Spade),
        ]);
        let score = HeuristicStrategy::default().evaluate_hand(&hand, Trump::suit(Suit::Club));
        assert!((score - 1.785).abs() < 1e-9);
        assert_eq!(choose_bid(score, &[0, 1, 2, 3]), Some(2));
    }

    #[test]
    fn cutoff_rank_itself_scores_nothing() {
        let hand = Hand::with_cards(vec![c(Rank::Six, Suit::Heart)]);
        let score = HeuristicStrategy::default().evaluate_hand(&hand, Trump::NONE);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn bid_clamps_to_largest_option() {
        assert_eq!(choose_bid(4.6, &[0, 1, 2, 3]), Some(3));
    }

    #[test]
    fn bid_falls_back_to_closest_option() {
        // rounded 2 is forbidden; 1.6 is nearer 1 than 3
        assert_eq!(choose_bid(1.6, &[0, 1, 3]), Some(1));
        assert_eq!(choose_bid(2.4, &[0, 1, 3]), Some(3));
    }

    #[test]
    fn bid_ties_go_to_first_option() {
        assert_eq!(choose_bid(2.0, &[0, 1, 3, 4]), Some(1));
    }

    #[test]
    fn bid_rounds_half_to_even() {
        assert_eq!(choose_bid(2.5, &[0, 1, 2, 3]), Some(2));
        assert_eq!(choose_bid(1.5, &[0, 1, 2, 3]), Some(2));
        assert_eq!(choose_bid(0.5, &[0, 1, 2]), Some(0));
    }

    #[test]
    fn single_legal_card_is_forced() {
        let hand = Hand::with_cards(vec![c(Rank::Two, Suit::Club), c(Rank::Ace, Suit::Spade)]);
        let trick = trick_of(&[c(Rank::King, Suit::Club)]);
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 1, 0),
            c(Rank::Two, Suit::Club)
        );
    }

    #[test]
    fn contract_met_leader_plays_lowest_rank() {
        let hand = Hand::with_cards(vec![
            c(Rank::Nine, Suit::Club),
            c(Rank::Four, Suit::Heart),
            c(Rank::King, Suit::Spade),
        ]);
        let trick = Trick::new(4);
        assert_eq!(
            play(&hand, &trick, Trump::suit(Suit::Heart), 1, 1),
            c(Rank::Four, Suit::Heart)
        );
    }

    #[test]
    fn contract_met_follower_ducks_with_highest_loser() {
        let hand = Hand::with_cards(vec![
            c(Rank::Three, Suit::Diamond),
            c(Rank::Nine, Suit::Diamond),
            c(Rank::Queen, Suit::Diamond),
            c(Rank::Ace, Suit::Diamond),
        ]);
        let trick = trick_of(&[c(Rank::Ten, Suit::Diamond)]);
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 0, 0),
            c(Rank::Nine, Suit::Diamond)
        );
    }

    #[test]
    fn contract_met_follower_discards_trump_last() {
        let hand = Hand::with_cards(vec![c(Rank::Two, Suit::Spade), c(Rank::King, Suit::Heart)]);
        let trick = trick_of(&[c(Rank::Four, Suit::Club)]);
        // void in clubs: the spade trump would win, so the king of hearts goes
        assert_eq!(
            play(&hand, &trick, Trump::suit(Suit::Spade), 2, 2),
            c(Rank::King, Suit::Heart)
        );
    }

    #[test]
    fn contract_met_follower_accepts_lowest_when_every_card_wins() {
        let hand = Hand::with_cards(vec![c(Rank::Queen, Suit::Club), c(Rank::Ace, Suit::Club)]);
        let trick = trick_of(&[c(Rank::Jack, Suit::Club)]);
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 0, 0),
            c(Rank::Queen, Suit::Club)
        );
    }

    #[test]
    fn chasing_leader_plays_highest_rank() {
        let hand = Hand::with_cards(vec![
            c(Rank::King, Suit::Club),
            c(Rank::Ace, Suit::Diamond),
            c(Rank::Ace, Suit::Spade),
        ]);
        let trick = Trick::new(4);
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 2, 0),
            c(Rank::Ace, Suit::Diamond)
        );
    }

    #[test]
    fn chasing_follower_plays_highest_winner() {
        let hand = Hand::with_cards(vec![
            c(Rank::Jack, Suit::Heart),
            c(Rank::King, Suit::Heart),
            c(Rank::Ace, Suit::Heart),
        ]);
        let trick = trick_of(&[c(Rank::Ten, Suit::Heart), c(Rank::Two, Suit::Heart)]);
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 1, 0),
            c(Rank::Ace, Suit::Heart)
        );
    }

    #[test]
    fn chasing_follower_trumps_in_when_void() {
        let hand = Hand::with_cards(vec![
            c(Rank::Three, Suit::Spade),
            c(Rank::Ace, Suit::Diamond),
            c(Rank::Five, Suit::Spade),
        ]);
        let trick = trick_of(&[c(Rank::King, Suit::Club)]);
        assert_eq!(
            play(&hand, &trick, Trump::suit(Suit::Spade), 1, 0),
            c(Rank::Five, Suit::Spade)
        );
    }

    #[test]
    fn chasing_follower_discards_low_when_beaten() {
        let hand = Hand::with_cards(vec![
            c(Rank::Four, Suit::Club),
            c(Rank::Queen, Suit::Club),
        ]);
        let trick = trick_of(&[c(Rank::Three, Suit::Club), c(Rank::Two, Suit::Heart)]);
        assert_eq!(
            play(&hand, &trick, Trump::suit(Suit::Heart), 1, 0),
            c(Rank::Four, Suit::Club)
        );
    }

    #[test]
    fn chasing_follower_cannot_beat_an_off_suit_discard() {
        let hand = Hand::with_cards(vec![c(Rank::Four, Suit::Club), c(Rank::Ace, Suit::Club)]);
        let trick = trick_of(&[c(Rank::Five, Suit::Club), c(Rank::Three, Suit::Diamond)]);
        // the ace would take the trick, but it does not beat the diamond, so go low
        assert_eq!(
            play(&hand, &trick, Trump::NONE, 1, 0),
            c(Rank::Four, Suit::Club)
        );
    }

    #[test]
    fn empty_legal_set_is_an_error() {
        let hand = Hand::new();
        let trick = Trick::new(4);
        let view = view(&hand, &trick, Trump::NONE, 1, 0);
        assert!(matches!(
            HeuristicStrategy::default().play_card(&view, &[]),
            Err(StrategyError::NoLegalPlay)
        ));
    }
}
