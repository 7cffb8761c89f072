//! Robot player: produces equal amounts of a chosen subset of object types

use std::sync::Arc;

use crate::actions::ActionSpace;
use crate::agent::{Agent, AgentRole};
use crate::core::config::GameConfig;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, EpisodeRng, State};
use crate::policy::PolicyTable;

/// Decision rule for the robot
#[derive(Debug, Clone)]
pub enum RobotRule {
    /// Always abstain
    Idle,
    /// Always take the action at this index of the robot action space
    Fixed(usize),
    /// Produce more of what has been produced most so far: the action with
    /// the largest dot product against the current state, first on ties
    FollowState,
    /// Sample from a lookup-table policy over the robot action space
    Table(Arc<PolicyTable>),
}

/// The robot player
///
/// Does not know theta. Keeps a log of the human actions it has observed,
/// which is where a belief update would read from.
#[derive(Debug, Clone)]
pub struct Robot {
    space: Arc<ActionSpace>,
    rule: RobotRule,
    observed: Vec<ActionVector>,
}

impl Robot {
    pub fn new(space: Arc<ActionSpace>, rule: RobotRule) -> Result<Self> {
        match &rule {
            RobotRule::Fixed(index) if *index >= space.len() => {
                return Err(CirlError::Configuration(format!(
                    "fixed robot action {} out of range for {} actions",
                    index,
                    space.len()
                )));
            }
            RobotRule::Table(policy) if policy.action_list().actions() != space.actions() => {
                return Err(CirlError::Configuration(
                    "robot policy action list differs from the robot action space".into(),
                ));
            }
            _ => {}
        }
        Ok(Self {
            space,
            rule,
            observed: Vec::new(),
        })
    }

    /// Create a robot with a freshly generated subset action space
    pub fn from_config(config: &GameConfig, rule: RobotRule) -> Result<Self> {
        Self::new(Arc::new(ActionSpace::robot(config)?), rule)
    }

    pub fn rule(&self) -> &RobotRule {
        &self.rule
    }

    /// Record a human action seen this turn
    pub fn observe(&mut self, human_action: &ActionVector) {
        self.observed.push(human_action.clone());
    }

    pub fn observations(&self) -> &[ActionVector] {
        &self.observed
    }

    fn follow_state(&self, state: &State) -> ActionVector {
        let mut best: Option<(&ActionVector, f64)> = None;
        for action in self.space.iter() {
            let score = action.dot(state.as_slice());
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((action, score));
            }
        }
        best.map(|(a, _)| a.clone())
            .unwrap_or_else(|| self.space.null_action())
    }
}

impl Agent for Robot {
    fn role(&self) -> AgentRole {
        AgentRole::Robot
    }

    fn action_space(&self) -> &ActionSpace {
        &self.space
    }

    fn choose(&self, state: &State, rng: &mut EpisodeRng) -> Result<ActionVector> {
        match &self.rule {
            RobotRule::Idle => Ok(self.space.null_action()),
            RobotRule::Fixed(index) => self.space.get(*index).cloned().ok_or_else(|| {
                CirlError::Configuration(format!("fixed robot action {} out of range", index))
            }),
            RobotRule::FollowState => Ok(self.follow_state(state)),
            RobotRule::Table(policy) => policy.get_action(state, rng),
        }
    }
}
