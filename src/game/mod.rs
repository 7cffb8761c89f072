//! Game state and reward accumulation

pub mod state;

pub use state::GameState;
