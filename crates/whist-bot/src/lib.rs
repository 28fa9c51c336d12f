pub mod strategy;

pub use strategy::{
    HeuristicParams, HeuristicStrategy, HumanStrategy, PlayerView, RandomStrategy, Strategy,
    StrategyError, StrategyKind,
};
