pub mod opponent;
pub mod strategy;
