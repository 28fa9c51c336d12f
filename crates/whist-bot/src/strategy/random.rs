use super::StrategyError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use whist_core::model::card::Card;

/// Uniformly random legal choices; the baseline the heuristic was tuned against.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn make_bid(&mut self, options: &[u8]) -> Result<u8, StrategyError> {
        options
            .choose(&mut self.rng)
            .copied()
            .ok_or(StrategyError::NoOptions)
    }

    pub(crate) fn play_card(&mut self, legal: &[Card]) -> Result<Card, StrategyError> {
        legal
            .choose(&mut self.rng)
            .copied()
            .ok_or(StrategyError::NoLegalPlay)
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::RandomStrategy;
    use whist_core::model::card::Card;
    use whist_core::model::rank::Rank;
    use whist_core::model::suit::Suit;

    #[test]
    fn bids_stay_within_options() {
        let mut strategy = RandomStrategy::with_seed(17);
        let options = [0, 2, 5];
        for _ in 0..100 {
            let bid = strategy.make_bid(&options).unwrap();
            assert!(options.contains(&bid));
        }
    }

    #[test]
    fn plays_stay_within_legal_cards() {
        let mut strategy = RandomStrategy::with_seed(4);
        let legal = [
            Card::new(Rank::Two, Suit::Club),
            Card::new(Rank::Jack, Suit::Club),
        ];
        for _ in 0..100 {
            assert!(legal.contains(&strategy.play_card(&legal).unwrap()));
        }
    }

    #[test]
    fn seeded_choices_repeat() {
        let mut a = RandomStrategy::with_seed(99);
        let mut b = RandomStrategy::with_seed(99);
        let options: Vec<u8> = (0..=7).collect();
        let picks_a: Vec<_> = (0..20).map(|_| a.make_bid(&options).unwrap()).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.make_bid(&options).unwrap()).collect();
        assert_eq!(picks_a, picks_b);
    }
}
