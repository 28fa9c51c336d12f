use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use whist_core::game::match_state::MatchState;
use whist_core::game::schedule::RoundSchedule;
use whist_core::model::bidding::{bid_options, forbidden_bid};
use whist_core::model::card::Card;
use whist_core::model::deck::Deck;
use whist_core::model::player::PlayerId;
use whist_core::model::rank::Rank;
use whist_core::model::score::round_score;
use whist_core::model::suit::Suit;
use whist_core::model::trick::Trick;
use whist_core::model::trump::Trump;

fn resolve(cards: &[Card], trump: Trump) -> PlayerId {
    let mut trick = Trick::new(cards.len());
    for (seat, card) in cards.iter().enumerate() {
        trick.add_card(PlayerId::new(seat as u8), *card).unwrap();
    }
    trick.resolve(trump).unwrap()
}

#[test]
fn club_lead_without_trump_goes_to_highest_club() {
    let winner = resolve(
        &[
            Card::new(Rank::Five, Suit::Club),
            Card::new(Rank::King, Suit::Club),
            Card::new(Rank::Three, Suit::Diamond),
            Card::new(Rank::Ace, Suit::Club),
        ],
        Trump::NONE,
    );
    assert_eq!(winner, PlayerId::new(3));
}

#[test]
fn single_heart_trump_takes_club_trick() {
    let winner = resolve(
        &[
            Card::new(Rank::Ace, Suit::Club),
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::King, Suit::Club),
            Card::new(Rank::Queen, Suit::Club),
        ],
        Trump::suit(Suit::Heart),
    );
    assert_eq!(winner, PlayerId::new(1));
}

#[test]
fn dealer_excluded_from_zero_when_table_bid_matches_hand() {
    assert_eq!(forbidden_bid(5, &[3, 1, 1]), Some(0));
    assert!(!bid_options(5, &[3, 1, 1], true).contains(&0));
}

#[test]
fn contract_bonus_only_on_exact_match() {
    assert_eq!(round_score(3, 3), 13);
    assert_eq!(round_score(2, 3), 2);
}

#[test]
fn forbidden_bid_matches_hand_minus_prior_bids() {
    for hand_size in 1u8..=13 {
        for a in 0..=hand_size {
            for b in 0..=hand_size {
                let prior = [a, b];
                let sum = u32::from(a) + u32::from(b);
                let options = bid_options(hand_size, &prior, true);
                if sum <= u32::from(hand_size) {
                    let forbidden = hand_size - a - b;
                    assert!(!options.contains(&forbidden));
                    assert_eq!(options.len(), usize::from(hand_size));
                } else {
                    assert_eq!(options.len(), usize::from(hand_size) + 1);
                }
            }
        }
    }
}

#[test]
fn random_tricks_resolve_to_highest_trump_or_lead_card() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let players = rng.gen_range(2..=6);
        let mut cards = Card::ALL.to_vec();
        cards.shuffle(&mut rng);
        cards.truncate(players);
        let trump = Trump::for_round(rng.gen_range(0..5));

        let winner = resolve(&cards, trump);
        let winning_card = cards[winner.index()];

        let trumps: Vec<_> = cards.iter().filter(|c| trump.is_trump(**c)).collect();
        if let Some(best_trump) = trumps.iter().map(|c| c.rank).max() {
            assert!(trump.is_trump(winning_card));
            assert_eq!(winning_card.rank, best_trump);
        } else {
            let lead = cards[0].suit;
            let best_lead = cards
                .iter()
                .filter(|c| c.suit == lead)
                .map(|c| c.rank)
                .max()
                .unwrap();
            assert_eq!(winning_card.suit, lead);
            assert_eq!(winning_card.rank, best_lead);
        }
    }
}

#[test]
fn random_deals_never_duplicate_cards() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let players = rng.gen_range(2..=7);
        let hand_size = rng.gen_range(1..=52 / players);
        let mut deck = Deck::standard();
        let hands = deck.shuffle_and_deal(hand_size, players, &mut rng).unwrap();

        let mut seen = HashSet::new();
        for hand in &hands {
            assert_eq!(hand.len(), hand_size);
            for card in hand.iter() {
                assert!(seen.insert(*card));
            }
            assert!(!hand.legal_plays_for(Some(Suit::Spade)).is_empty());
        }
        assert!(hand_size * players <= 52);
    }
}

#[test]
fn legal_plays_only_offer_lead_suit_when_held() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut deck = Deck::standard();
    for _ in 0..200 {
        let hands = deck.shuffle_and_deal(6, 4, &mut rng).unwrap();
        for hand in &hands {
            for suit in Suit::ALL {
                let legal = hand.legal_plays_for(Some(suit));
                assert!(!legal.is_empty());
                if hand.has_suit(suit) {
                    assert!(legal.iter().all(|c| c.suit == suit));
                } else {
                    assert_eq!(legal.len(), hand.len());
                }
            }
        }
    }
}

#[test]
fn next_dealer_is_next_seat_in_table_order() {
    let mut state = MatchState::with_seed(5, RoundSchedule::uniform(3, 6), 13).unwrap();
    let mut dealers = Vec::new();
    while !state.is_game_over() {
        dealers.push(state.dealer().unwrap().index());
        let round = state.round_mut();
        while let Some(seat) = round.next_bidder() {
            let options = round.bid_options().unwrap();
            round.submit_bid(seat, *options.last().unwrap()).unwrap();
        }
        while let Some(seat) = round.expected_player() {
            let card = *round.legal_plays(seat).last().unwrap();
            round.play_card(seat, card).unwrap();
        }
        state.finish_round_and_start_next().unwrap();
    }
    assert_eq!(dealers, vec![4, 0, 1, 2, 3, 4]);
}
