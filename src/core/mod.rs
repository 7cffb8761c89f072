pub mod config;
pub mod error;
pub mod types;

pub use config::{GameConfig, QuantityRounding};
pub use error::{CirlError, Result};
pub use types::{ActionVector, EpisodeRng, PreferenceVector, Quantity, State, Turn};
