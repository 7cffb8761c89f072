//! Agents - the human and robot players of the production game
//!
//! Both variants expose the same capability set through [`Agent`]: pick an
//! action for the current state, or abstain with the null action. Agents are
//! read-only with respect to the game; the simulator feeds their actions to
//! [`crate::game::GameState::respond`].

pub mod human;
pub mod robot;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actions::ActionSpace;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, EpisodeRng, State};

pub use human::Human;
pub use robot::{Robot, RobotRule};

/// Which player an agent is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Human,
    Robot,
}

impl AgentRole {
    /// The role that acts on turn `t`: even turns are the human's
    pub fn for_turn(t: usize) -> Self {
        if t % 2 == 0 {
            AgentRole::Human
        } else {
            AgentRole::Robot
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Human => write!(f, "human"),
            AgentRole::Robot => write!(f, "robot"),
        }
    }
}

/// Capability shared by every player
pub trait Agent {
    fn role(&self) -> AgentRole;

    /// The agent's declared legal actions
    fn action_space(&self) -> &ActionSpace;

    /// Raw decision of the agent's policy, before legality checks
    fn choose(&self, state: &State, rng: &mut EpisodeRng) -> Result<ActionVector>;

    /// Select an action for `state`, guaranteed to be legal for this agent
    ///
    /// Legality is enforced here because `GameState::respond` does not
    /// check it.
    fn pick_action(&self, state: &State, rng: &mut EpisodeRng) -> Result<ActionVector> {
        let action = self.choose(state, rng)?;
        if !self.action_space().permits(&action) {
            return Err(CirlError::IllegalAction {
                agent: self.role().to_string(),
                action: action.to_string(),
            });
        }
        Ok(action)
    }

    /// Abstain: produce nothing
    fn null_action(&self) -> ActionVector {
        self.action_space().null_action()
    }
}
