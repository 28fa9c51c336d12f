//! Contract bidding and the dealer's hook rule.
//!
//! Every seat bids how many tricks it will take, from `0` up to the hand
//! size. The dealer bids last and may not choose the value that would make
//! the table's bids add up to exactly the number of tricks available.

use crate::model::player::PlayerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("bid {bid} is not one of the offered options {options:?}")]
    InvalidBid { bid: u8, options: Vec<u8> },
    #[error("expected {expected} to bid but got {actual}")]
    OutOfTurn { expected: PlayerId, actual: PlayerId },
    #[error("round is not accepting bids")]
    NotInBiddingPhase,
}

/// The dealer's forbidden bid, when one applies.
pub fn forbidden_bid(hand_size: u8, prior_bids: &[u8]) -> Option<u8> {
    let prior: u32 = prior_bids.iter().map(|&bid| u32::from(bid)).sum();
    u32::from(hand_size)
        .checked_sub(prior)
        .and_then(|remaining| u8::try_from(remaining).ok())
}

/// Legal bids in ascending order for the next bidder.
pub fn bid_options(hand_size: u8, prior_bids: &[u8], is_dealer: bool) -> Vec<u8> {
    let forbidden = if is_dealer {
        forbidden_bid(hand_size, prior_bids)
    } else {
        None
    };
    (0..=hand_size)
        .filter(|&bid| Some(bid) != forbidden)
        .collect()
}

pub fn validate_bid(bid: u8, options: &[u8]) -> Result<u8, BidError> {
    if options.contains(&bid) {
        Ok(bid)
    } else {
        Err(BidError::InvalidBid {
            bid,
            options: options.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BidError, bid_options, forbidden_bid, validate_bid};

    #[test]
    fn non_dealers_are_never_restricted() {
        assert_eq!(bid_options(5, &[1, 2], false), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn dealer_cannot_complete_the_table() {
        assert_eq!(forbidden_bid(5, &[1, 2, 0]), Some(2));
        assert_eq!(bid_options(5, &[1, 2, 0], true), vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn dealer_loses_zero_when_bids_already_match() {
        let options = bid_options(5, &[2, 2, 1], true);
        assert!(!options.contains(&0));
        assert_eq!(options, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn overbid_table_leaves_dealer_unrestricted() {
        assert_eq!(forbidden_bid(3, &[3, 2, 1]), None);
        assert_eq!(bid_options(3, &[3, 2, 1], true), vec![0, 1, 2, 3]);
    }

    #[test]
    fn forbidden_value_is_full_hand_when_nobody_bid() {
        assert_eq!(forbidden_bid(4, &[0, 0, 0]), Some(4));
        assert_eq!(forbidden_bid(1, &[]), Some(1));
    }

    #[test]
    fn validate_rejects_values_outside_options() {
        let options = vec![0, 1, 3];
        assert_eq!(validate_bid(3, &options), Ok(3));
        assert_eq!(
            validate_bid(2, &options),
            Err(BidError::InvalidBid {
                bid: 2,
                options: vec![0, 1, 3]
            })
        );
    }
}
