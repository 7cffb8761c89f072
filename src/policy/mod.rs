//! Stochastic policies over enumerated game states

pub mod sampling;
pub mod table;

pub use sampling::sample_index;
pub use table::{PolicySpec, PolicyTable, ROW_SUM_TOLERANCE};
