//! Scenario files - a game configuration plus the agents that play it
//!
//! ```toml
//! [game]
//! num_objects = 2
//! human_prod_cap = 4
//! max_t = 2
//!
//! [robot]
//! kind = "fixed"
//! index = 2
//!
//! [[human_policies]]
//! name = "balanced"
//! state_list = [[0.0, 0.0]]
//! lookup_table = [[0.0, 0.0, 1.0, 0.0, 0.0]]
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::actions::ActionSpace;
use crate::agent::{AgentRole, RobotRule};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::policy::{PolicySpec, PolicyTable};
use crate::simulation::episode::SimulationConfig;
use crate::simulation::reachable::decision_states;

/// On-disk form of [`RobotRule`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RobotRuleSpec {
    Idle,
    Fixed {
        index: usize,
    },
    #[default]
    FollowState,
    Table {
        policy: PolicySpec,
    },
}

impl RobotRuleSpec {
    pub fn into_rule(self, robot_space: &Arc<ActionSpace>) -> Result<RobotRule> {
        Ok(match self {
            RobotRuleSpec::Idle => RobotRule::Idle,
            RobotRuleSpec::Fixed { index } => RobotRule::Fixed(index),
            RobotRuleSpec::FollowState => RobotRule::FollowState,
            RobotRuleSpec::Table { policy } => {
                RobotRule::Table(Arc::new(policy.into_table(robot_space.clone())?))
            }
        })
    }
}

/// A complete scenario as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub game: GameConfig,
    pub robot: RobotRuleSpec,
    pub human_policies: Vec<PolicySpec>,
}

impl ScenarioFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Generate the action spaces and check every policy against them
    ///
    /// An empty `human_policies` list is passed through; the simulator
    /// rejects it unless the caller fills it in first.
    pub fn into_simulation_config(self) -> Result<SimulationConfig> {
        self.game.validate()?;
        let human_space = Arc::new(ActionSpace::human(&self.game)?);
        let robot_space = Arc::new(ActionSpace::robot(&self.game)?);

        let human_policies = self
            .human_policies
            .into_iter()
            .map(|spec| spec.into_table(human_space.clone()).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let robot_rule = self.robot.into_rule(&robot_space)?;

        tracing::debug!(
            "Scenario loaded: {} object types, {} human actions, {} robot actions, {} human policies",
            self.game.num_objects,
            human_space.len(),
            robot_space.len(),
            human_policies.len()
        );

        Ok(SimulationConfig {
            game: self.game,
            human_policies,
            robot_rule,
        })
    }
}

/// `count` random full-support human policies covering every state the
/// human can be asked to act in
pub fn random_human_policies<R: Rng + ?Sized>(
    game: &GameConfig,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Arc<PolicyTable>>> {
    game.validate()?;
    let human_space = Arc::new(ActionSpace::human(game)?);
    let robot_space = ActionSpace::robot(game)?;
    let states = decision_states(&human_space, &robot_space, game.max_t, AgentRole::Human)?;

    tracing::debug!(
        "Generating {} random human policies over {} states",
        count,
        states.len()
    );

    (0..count)
        .map(|_| PolicyTable::random(states.clone(), human_space.clone(), &mut *rng).map(Arc::new))
        .collect()
}
