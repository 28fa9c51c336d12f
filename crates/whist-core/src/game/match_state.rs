use crate::game::round::{RoundPhase, RoundResult, RoundState};
use crate::game::schedule::RoundSchedule;
use crate::model::deck::{DealError, Deck};
use crate::model::player::PlayerId;
use crate::model::score::ScoreBoard;
use crate::model::trump::Trump;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event};

/// A whole game: the schedule of rounds, rotating dealer and trump, running totals.
#[derive(Debug, Clone)]
pub struct MatchState {
    schedule: RoundSchedule,
    round_index: usize,
    play_order: Vec<PlayerId>,
    scores: ScoreBoard,
    history: Vec<RoundResult>,
    current_round: RoundState,
    deck: Deck,
    rng: StdRng,
    seed: u64,
    game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("the round schedule is empty")]
    EmptySchedule,
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error("current round still has tricks to play")]
    RoundInProgress,
    #[error("every scheduled round has been played")]
    GameOver,
}

impl MatchState {
    pub fn new(players: usize, schedule: RoundSchedule) -> Result<Self, MatchError> {
        let seed: u64 = rand::random();
        Self::with_seed(players, schedule, seed)
    }

    /// Seat 0 leads the first round and the last seat deals.
    pub fn with_seed(
        players: usize,
        schedule: RoundSchedule,
        seed: u64,
    ) -> Result<Self, MatchError> {
        if schedule.is_empty() {
            return Err(MatchError::EmptySchedule);
        }
        schedule.check(players)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = Deck::standard();
        let play_order: Vec<PlayerId> = PlayerId::all(players).collect();
        let current_round = Self::deal_round(&schedule, 0, &mut deck, &play_order, &mut rng)?;

        Ok(Self {
            schedule,
            round_index: 0,
            play_order,
            scores: ScoreBoard::new(players),
            history: Vec::new(),
            current_round,
            deck,
            rng,
            seed,
            game_over: false,
        })
    }

    fn deal_round(
        schedule: &RoundSchedule,
        round_index: usize,
        deck: &mut Deck,
        play_order: &[PlayerId],
        rng: &mut StdRng,
    ) -> Result<RoundState, MatchError> {
        let hand_size = schedule
            .hand_size(round_index)
            .ok_or(MatchError::GameOver)?;
        let trump = RoundSchedule::trump(round_index);
        let round = RoundState::deal(deck, hand_size, trump, play_order.to_vec(), rng)?;
        event!(
            target: "whist_core::match",
            Level::DEBUG,
            round = round_index + 1,
            hand_size,
            trump = %trump,
            dealer = play_order.last().map(|seat| seat.index()).unwrap_or(0)
        );
        Ok(round)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> usize {
        self.play_order.len()
    }

    pub fn schedule(&self) -> &RoundSchedule {
        &self.schedule
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    /// One-based number of the round in progress.
    pub fn round_number(&self) -> usize {
        self.round_index + 1
    }

    pub fn trump(&self) -> Trump {
        self.current_round.trump()
    }

    pub fn play_order(&self) -> &[PlayerId] {
        &self.play_order
    }

    pub fn dealer(&self) -> Option<PlayerId> {
        self.play_order.last().copied()
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_round_ready_for_scoring(&self) -> bool {
        self.current_round.phase() == RoundPhase::Complete
    }

    /// Scores the finished round, rotates the dealer and deals the next round if one remains.
    pub fn finish_round_and_start_next(&mut self) -> Result<RoundResult, MatchError> {
        if self.game_over {
            return Err(MatchError::GameOver);
        }
        let result = self
            .current_round
            .result()
            .ok_or(MatchError::RoundInProgress)?;
        self.scores.apply_round(&result.points());
        self.history.push(result.clone());

        self.play_order.rotate_left(1);
        self.round_index += 1;

        if self.round_index >= self.schedule.len() {
            self.game_over = true;
            return Ok(result);
        }

        self.current_round = Self::deal_round(
            &self.schedule,
            self.round_index,
            &mut self.deck,
            &self.play_order,
            &mut self.rng,
        )?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchError, MatchState};
    use crate::game::round::RoundPhase;
    use crate::game::schedule::RoundSchedule;
    use crate::model::deck::DealError;
    use crate::model::player::PlayerId;
    use crate::model::suit::Suit;
    use crate::model::trump::Trump;

    /// Plays the current round with every seat bidding its first option and
    /// playing its first legal card.
    fn autoplay_round(state: &mut MatchState) {
        let round = state.round_mut();
        while let Some(seat) = round.next_bidder() {
            let bid = round.bid_options().unwrap()[0];
            round.submit_bid(seat, bid).unwrap();
        }
        while let Some(seat) = round.expected_player() {
            let card = round.legal_plays(seat)[0];
            round.play_card(seat, card).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::Complete);
        assert!(state.is_round_ready_for_scoring());
    }

    #[test]
    fn new_match_starts_first_round_with_club_trump() {
        let state = MatchState::with_seed(4, RoundSchedule::standard(), 0).unwrap();
        assert_eq!(state.round_number(), 1);
        assert_eq!(state.trump(), Trump::suit(Suit::Club));
        assert_eq!(state.round().hand_size(), 7);
        assert_eq!(state.dealer(), Some(PlayerId::new(3)));
    }

    #[test]
    fn finish_round_rotates_dealer_and_trump() {
        let mut state = MatchState::with_seed(4, RoundSchedule::standard(), 3).unwrap();

        autoplay_round(&mut state);
        state.finish_round_and_start_next().unwrap();
        assert_eq!(state.round_number(), 2);
        assert_eq!(state.trump(), Trump::suit(Suit::Diamond));
        assert_eq!(state.round().hand_size(), 5);
        assert_eq!(state.dealer(), Some(PlayerId::new(0)));
        assert_eq!(state.round().play_order()[0], PlayerId::new(1));

        autoplay_round(&mut state);
        state.finish_round_and_start_next().unwrap();
        assert_eq!(state.dealer(), Some(PlayerId::new(1)));
    }

    #[test]
    fn scoring_before_round_finishes_is_rejected() {
        let mut state = MatchState::with_seed(3, RoundSchedule::uniform(2, 1), 9).unwrap();
        assert_eq!(
            state.finish_round_and_start_next(),
            Err(MatchError::RoundInProgress)
        );
    }

    #[test]
    fn game_ends_after_schedule_and_totals_add_up() {
        let mut state = MatchState::with_seed(4, RoundSchedule::new(vec![3, 1]), 21).unwrap();
        let mut expected = vec![0u32; 4];
        while !state.is_game_over() {
            autoplay_round(&mut state);
            let result = state.finish_round_and_start_next().unwrap();
            for (total, points) in expected.iter_mut().zip(result.points()) {
                *total += points;
            }
        }
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.scores().standings(), expected.as_slice());
        assert_eq!(
            state.finish_round_and_start_next(),
            Err(MatchError::GameOver)
        );
    }

    #[test]
    fn same_seed_deals_same_hands() {
        let a = MatchState::with_seed(4, RoundSchedule::standard(), 77).unwrap();
        let b = MatchState::with_seed(4, RoundSchedule::standard(), 77).unwrap();
        for seat in PlayerId::all(4) {
            assert_eq!(a.round().hand(seat), b.round().hand(seat));
        }
        assert_eq!(a.seed(), 77);
    }

    #[test]
    fn undealable_schedule_is_rejected_up_front() {
        assert!(matches!(
            MatchState::with_seed(6, RoundSchedule::new(vec![9]), 0),
            Err(MatchError::Deal(DealError::DeckExhausted { .. }))
        ));
        assert_eq!(
            MatchState::with_seed(4, RoundSchedule::new(Vec::new()), 0).unwrap_err(),
            MatchError::EmptySchedule
        );
    }
}
