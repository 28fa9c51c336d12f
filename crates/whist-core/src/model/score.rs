use crate::model::player::PlayerId;

/// Added to the trick count when a contract is made exactly.
pub const CONTRACT_BONUS: u32 = 10;

/// Points for one seat in one round: tricks taken, plus the bonus on an exact contract.
pub fn round_score(tricks_won: u8, bid: u8) -> u32 {
    let base = u32::from(tricks_won);
    if tricks_won == bid {
        base + CONTRACT_BONUS
    } else {
        base
    }
}

/// Running game totals, one entry per seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: Vec<u32>,
}

impl ScoreBoard {
    pub fn new(players: usize) -> Self {
        Self {
            totals: vec![0; players],
        }
    }

    pub fn score(&self, seat: PlayerId) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32] {
        &self.totals
    }

    /// Highest total; ties go to the earlier seat.
    pub fn leading_player(&self) -> Option<PlayerId> {
        self.totals
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, points)| **points)
            .map(|(index, _)| PlayerId::new(index as u8))
    }

    pub fn apply_round(&mut self, round_points: &[u32]) {
        for (total, points) in self.totals.iter_mut().zip(round_points) {
            *total += points;
        }
    }
}
