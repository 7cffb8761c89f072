//! GameState - cumulative production and reward bookkeeping

use serde::{Deserialize, Serialize};

use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, PreferenceVector, State};

/// The mutable state of one episode
///
/// Owns the cumulative production counts and the episode's theta. Reward is
/// linear in production, so `total_reward()` always equals the sum of the
/// rewards returned by `respond` (up to floating-point rounding).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    state: State,
    theta: PreferenceVector,
    last_human_action: Option<ActionVector>,
    turns_played: usize,
}

impl GameState {
    pub fn new(theta: PreferenceVector) -> Self {
        Self {
            state: State::zeros(theta.len()),
            theta,
            last_human_action: None,
            turns_played: 0,
        }
    }

    /// Apply one turn of production and return its reward
    ///
    /// Only vector lengths are checked. Whether the actions were legal for
    /// their agents is the caller's responsibility.
    pub fn respond(
        &mut self,
        human_action: &ActionVector,
        robot_action: &ActionVector,
    ) -> Result<f64> {
        if human_action.len() != self.state.len() || robot_action.len() != self.state.len() {
            return Err(CirlError::Configuration(format!(
                "actions of length {} and {} do not match a state of length {}",
                human_action.len(),
                robot_action.len(),
                self.state.len()
            )));
        }

        let produced = human_action.combined(robot_action)?;
        self.state.accumulate(&produced)?;
        self.last_human_action = Some(human_action.clone());
        self.turns_played += 1;

        Ok(produced.dot(self.theta.as_slice()))
    }

    /// Reward for everything produced so far
    pub fn total_reward(&self) -> f64 {
        self.state.dot(self.theta.as_slice())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn theta(&self) -> &PreferenceVector {
        &self.theta
    }

    pub fn last_human_action(&self) -> Option<&ActionVector> {
        self.last_human_action.as_ref()
    }

    pub fn turns_played(&self) -> usize {
        self.turns_played
    }
}
