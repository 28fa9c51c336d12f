use crate::game::snapshot::PlaySnapshot;
use crate::model::bidding::{self, BidError};
use crate::model::card::Card;
use crate::model::deck::{DealError, Deck};
use crate::model::hand::{Hand, HandError};
use crate::model::player::{PlayerId, PlayerState};
use crate::model::score::round_score;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use crate::model::trump::Trump;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

/// One deal: bidding, then `hand_size` tricks.
#[derive(Debug, Clone)]
pub struct RoundState {
    trump: Trump,
    hand_size: u8,
    play_order: Vec<PlayerId>,
    seats: Vec<PlayerState>,
    bids: Vec<u8>,
    current_trick: Trick,
    leader: PlayerId,
    trick_history: Vec<Trick>,
    phase: RoundPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Bidding,
    Playing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: PlayerId, round_complete: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("round is not in the playing phase")]
    NotInPlayPhase,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },
    #[error("must follow {0} while holding it")]
    MustFollowSuit(Suit),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Trick(#[from] TrickError),
}

/// Final tally for one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatResult {
    pub player: PlayerId,
    pub bid: u8,
    pub tricks: u8,
    pub points: u32,
}

impl SeatResult {
    pub fn contract_made(&self) -> bool {
        self.bid == self.tricks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub trump: Trump,
    pub hand_size: u8,
    pub dealer: PlayerId,
    pub seats: Vec<SeatResult>,
}

impl RoundResult {
    pub fn points(&self) -> Vec<u32> {
        self.seats.iter().map(|seat| seat.points).collect()
    }
}

impl RoundState {
    /// Shuffles `deck` and deals `hand_size` cards to every seat in `play_order`.
    ///
    /// `play_order` lists every seat once; the first entry leads the first
    /// trick and the last entry is the dealer.
    pub fn deal<R: rand::Rng + ?Sized>(
        deck: &mut Deck,
        hand_size: u8,
        trump: Trump,
        play_order: Vec<PlayerId>,
        rng: &mut R,
    ) -> Result<Self, DealError> {
        let players = play_order.len();
        let dealt = deck.shuffle_and_deal(usize::from(hand_size), players, rng)?;
        let mut hands = vec![Hand::new(); players];
        for (seat, hand) in play_order.iter().zip(dealt) {
            hands[seat.index()] = hand;
        }
        Ok(Self::from_hands(hands, trump, play_order))
    }

    /// Builds a round from pre-dealt hands indexed by seat.
    pub fn from_hands(hands: Vec<Hand>, trump: Trump, play_order: Vec<PlayerId>) -> Self {
        let players = hands.len();
        let hand_size = hands.iter().map(Hand::dealt).max().unwrap_or(0) as u8;
        let leader = play_order.first().copied().unwrap_or(PlayerId::new(0));
        Self {
            trump,
            hand_size,
            play_order,
            seats: hands.into_iter().map(PlayerState::with_hand).collect(),
            bids: Vec::with_capacity(players),
            current_trick: Trick::new(players),
            leader,
            trick_history: Vec::with_capacity(usize::from(hand_size)),
            phase: RoundPhase::Bidding,
        }
    }

    pub fn trump(&self) -> Trump {
        self.trump
    }

    pub fn hand_size(&self) -> u8 {
        self.hand_size
    }

    pub fn players(&self) -> usize {
        self.seats.len()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn play_order(&self) -> &[PlayerId] {
        &self.play_order
    }

    pub fn dealer(&self) -> Option<PlayerId> {
        self.play_order.last().copied()
    }

    pub fn player(&self, seat: PlayerId) -> &PlayerState {
        &self.seats[seat.index()]
    }

    pub fn hand(&self, seat: PlayerId) -> &Hand {
        self.seats[seat.index()].hand()
    }

    /// Bids placed so far, in bidding order.
    pub fn bids(&self) -> &[u8] {
        &self.bids
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn next_bidder(&self) -> Option<PlayerId> {
        match self.phase {
            RoundPhase::Bidding => self.play_order.get(self.bids.len()).copied(),
            _ => None,
        }
    }

    /// Options open to the next bidder, with the dealer restriction applied.
    pub fn bid_options(&self) -> Result<Vec<u8>, BidError> {
        let bidder = self.next_bidder().ok_or(BidError::NotInBiddingPhase)?;
        let is_dealer = Some(bidder) == self.dealer();
        Ok(bidding::bid_options(self.hand_size, &self.bids, is_dealer))
    }

    pub fn submit_bid(&mut self, seat: PlayerId, bid: u8) -> Result<(), BidError> {
        let expected = self.next_bidder().ok_or(BidError::NotInBiddingPhase)?;
        if expected != seat {
            return Err(BidError::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        let options = self.bid_options()?;
        bidding::validate_bid(bid, &options)?;

        self.seats[seat.index()].set_contract(bid);
        self.bids.push(bid);
        event!(
            target: "whist_core::round",
            Level::DEBUG,
            seat = seat.index(),
            bid,
            total = self.bids.iter().map(|&b| u32::from(b)).sum::<u32>(),
            hand_size = self.hand_size
        );

        if self.bids.len() == self.play_order.len() {
            self.phase = RoundPhase::Playing;
        }
        Ok(())
    }

    pub fn expected_player(&self) -> Option<PlayerId> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        let players = self.players();
        Some(
            self.current_trick
                .plays()
                .last()
                .map(|play| play.player.next(players))
                .unwrap_or(self.leader),
        )
    }

    pub fn legal_plays(&self, seat: PlayerId) -> Vec<Card> {
        self.hand(seat).legal_plays(&self.current_trick)
    }

    pub fn play_card(&mut self, seat: PlayerId, card: Card) -> Result<PlayOutcome, PlayError> {
        let expected = self.expected_player().ok_or(PlayError::NotInPlayPhase)?;
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let hand = self.seats[seat.index()].hand_mut();
        if !hand.contains(card) {
            return Err(HandError::CardNotInHand(card).into());
        }
        if let Some(lead) = self.current_trick.lead_suit() {
            if card.suit != lead && hand.has_suit(lead) {
                return Err(PlayError::MustFollowSuit(lead));
            }
        }

        hand.play(card)?;
        self.current_trick.add_card(seat, card)?;
        event!(
            target: "whist_core::round",
            Level::DEBUG,
            seat = seat.index(),
            card = %card,
            position = self.current_trick.len()
        );

        if !self.current_trick.is_complete() {
            return Ok(PlayOutcome::Played);
        }

        let winner = self.current_trick.resolve(self.trump)?;
        for (index, state) in self.seats.iter_mut().enumerate() {
            state.absorb_trick(PlayerId::new(index as u8), &self.current_trick);
        }
        let players = self.players();
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(players));
        self.trick_history.push(finished);
        self.leader = winner;

        let round_complete = self.trick_history.len() == usize::from(self.hand_size);
        if round_complete {
            self.phase = RoundPhase::Complete;
        }
        event!(
            target: "whist_core::round",
            Level::DEBUG,
            winner = winner.index(),
            trick = self.trick_history.len(),
            round_complete
        );
        Ok(PlayOutcome::TrickCompleted {
            winner,
            round_complete,
        })
    }

    /// The acting seat's view, for collectors that record decisions.
    pub fn snapshot(&self, seat: PlayerId) -> PlaySnapshot {
        let state = self.player(seat);
        PlaySnapshot {
            player: seat,
            hand: state.hand().cards().to_vec(),
            cards_seen: state.cards_seen().to_vec(),
            trick: self.current_trick.plays().to_vec(),
            contract: state.contract(),
            trick_count: state.trick_count(),
            trick_fraction: state.hand().trick_fraction(),
            hand_size: self.hand_size,
            trump: self.trump,
        }
    }

    /// Scores every seat once all tricks are played.
    pub fn result(&self) -> Option<RoundResult> {
        if self.phase != RoundPhase::Complete {
            return None;
        }
        let seats = self
            .seats
            .iter()
            .enumerate()
            .map(|(index, state)| {
                let bid = state.contract().unwrap_or(0);
                SeatResult {
                    player: PlayerId::new(index as u8),
                    bid,
                    tricks: state.trick_count(),
                    points: round_score(state.trick_count(), bid),
                }
            })
            .collect();
        Some(RoundResult {
            trump: self.trump,
            hand_size: self.hand_size,
            dealer: self.dealer().unwrap_or(PlayerId::new(0)),
            seats,
        })
    }
}
