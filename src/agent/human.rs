//! Human player: splits a fixed production budget across object types

use std::sync::Arc;

use crate::actions::ActionSpace;
use crate::agent::{Agent, AgentRole};
use crate::core::config::GameConfig;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, EpisodeRng, PreferenceVector, State};
use crate::policy::PolicyTable;

/// The human player
///
/// Knows theta and acts through a lookup-table policy chosen for the episode.
#[derive(Debug, Clone)]
pub struct Human {
    space: Arc<ActionSpace>,
    policy: Arc<PolicyTable>,
    /// The episode's preference vector; the simulator seeds the game state
    /// and the episode record from it. Policies are chosen per theta by the
    /// caller, so `choose` does not consult it.
    theta: PreferenceVector,
}

impl Human {
    /// Create a human whose policy is defined over `space`
    pub fn new(
        space: Arc<ActionSpace>,
        policy: Arc<PolicyTable>,
        theta: PreferenceVector,
    ) -> Result<Self> {
        if policy.action_list().actions() != space.actions() {
            return Err(CirlError::Configuration(
                "human policy action list differs from the human action space".into(),
            ));
        }
        if theta.len() != space.num_objects() {
            return Err(CirlError::Configuration(format!(
                "theta has {} weights but the game has {} object types",
                theta.len(),
                space.num_objects()
            )));
        }
        Ok(Self {
            space,
            policy,
            theta,
        })
    }

    /// Create a human with a freshly generated composition action space
    pub fn from_config(
        config: &GameConfig,
        policy: Arc<PolicyTable>,
        theta: PreferenceVector,
    ) -> Result<Self> {
        Self::new(Arc::new(ActionSpace::human(config)?), policy, theta)
    }

    pub fn theta(&self) -> &PreferenceVector {
        &self.theta
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }
}

impl Agent for Human {
    fn role(&self) -> AgentRole {
        AgentRole::Human
    }

    fn action_space(&self) -> &ActionSpace {
        &self.space
    }

    fn choose(&self, state: &State, rng: &mut EpisodeRng) -> Result<ActionVector> {
        self.policy.get_action(state, rng)
    }
}
