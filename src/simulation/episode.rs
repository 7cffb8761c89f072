//! Episode loop
//!
//! One episode draws theta, picks a human policy, then alternates turns over
//! a fixed horizon:
//! 1. Even turns: the human picks an action, the robot abstains
//! 2. Odd turns: the robot picks an action, the human abstains
//! 3. `GameState::respond` applies both actions and returns the turn reward
//! 4. The robot observes the human's action
//!
//! Every random draw comes from one `EpisodeRng` seeded by the caller, in the
//! order theta, policy choice, then turn-by-turn action draws, so a seed fully
//! determines the trajectory.

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::actions::ActionSpace;
use crate::agent::{Agent, AgentRole, Human, Robot, RobotRule};
use crate::core::config::GameConfig;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, EpisodeRng, PreferenceVector, State, Turn};
use crate::game::GameState;
use crate::policy::PolicyTable;
use crate::simulation::batch::BatchReport;
use crate::simulation::theta::draw_theta;

/// Everything an episode needs besides its seed
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub game: GameConfig,
    /// Candidate human policies; one is chosen uniformly per episode
    pub human_policies: Vec<Arc<PolicyTable>>,
    pub robot_rule: RobotRule,
}

/// One turn of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: Turn,
    pub actor: AgentRole,
    /// State before the turn's actions were applied
    pub state: State,
    pub human_action: ActionVector,
    pub robot_action: ActionVector,
    /// Undiscounted reward returned by `respond`
    pub reward: f64,
}

/// Result of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub seed: u64,
    pub theta: PreferenceVector,
    pub policy_index: usize,
    pub trajectory: Vec<TurnRecord>,
    pub final_state: State,
    /// `GameState::total_reward()` at the end of the episode
    pub total_reward: f64,
    /// Sum of `gamma^t * reward_t`
    pub discounted_return: f64,
    pub discounted: bool,
}

impl EpisodeOutcome {
    /// The episode's scalar outcome: discounted return when discounting is on
    pub fn score(&self) -> f64 {
        if self.discounted {
            self.discounted_return
        } else {
            self.total_reward
        }
    }
}

/// Validated simulation setup with action spaces generated once
///
/// Cheap to share across threads: spaces and policies sit behind `Arc`.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
    human_space: Arc<ActionSpace>,
    robot_space: Arc<ActionSpace>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.game.validate()?;

        if config.human_policies.is_empty() {
            return Err(CirlError::Configuration(
                "at least one candidate human policy is required".into(),
            ));
        }

        let human_space = Arc::new(ActionSpace::human(&config.game)?);
        let robot_space = Arc::new(ActionSpace::robot(&config.game)?);

        for (i, policy) in config.human_policies.iter().enumerate() {
            if policy.action_list().actions() != human_space.actions() {
                return Err(CirlError::Configuration(format!(
                    "human policy {} is not defined over the human action space",
                    i
                )));
            }
        }

        // Robot construction checks the rule against its space
        Robot::new(robot_space.clone(), config.robot_rule.clone())?;

        Ok(Self {
            config,
            human_space,
            robot_space,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn human_space(&self) -> &Arc<ActionSpace> {
        &self.human_space
    }

    pub fn robot_space(&self) -> &Arc<ActionSpace> {
        &self.robot_space
    }

    /// Run one episode from `seed`
    pub fn run_episode(&self, seed: u64) -> Result<EpisodeOutcome> {
        let game_config = &self.config.game;
        let mut rng = EpisodeRng::seed_from_u64(seed);

        let theta = draw_theta(game_config.num_objects, &mut rng)?;
        let policy_index = rng.gen_range(0..self.config.human_policies.len());
        let policy = self.config.human_policies[policy_index].clone();

        tracing::debug!(
            "Episode seed {}: theta {:?}, human policy {}",
            seed,
            theta.as_slice(),
            policy_index
        );

        let human = Human::new(self.human_space.clone(), policy, theta)?;
        let mut game = GameState::new(human.theta().clone());
        let mut robot = Robot::new(self.robot_space.clone(), self.config.robot_rule.clone())?;

        let mut trajectory = Vec::with_capacity(game_config.max_t);
        let mut discounted_return = 0.0;
        let mut discount = 1.0;

        for t in 0..game_config.max_t {
            let state = game.state().clone();
            let actor = AgentRole::for_turn(t);
            let (human_action, robot_action) = match actor {
                AgentRole::Human => (human.pick_action(&state, &mut rng)?, robot.null_action()),
                AgentRole::Robot => (human.null_action(), robot.pick_action(&state, &mut rng)?),
            };

            let reward = game.respond(&human_action, &robot_action)?;
            robot.observe(&human_action);

            discounted_return += discount * reward;
            discount *= game_config.gamma;

            tracing::trace!(
                "Turn {}: {} acts, human {} robot {} -> reward {:.4}",
                t,
                actor,
                human_action,
                robot_action,
                reward
            );

            trajectory.push(TurnRecord {
                turn: t,
                actor,
                state,
                human_action,
                robot_action,
                reward,
            });
        }

        let total_reward = game.total_reward();
        tracing::debug!(
            "Episode seed {} finished: total reward {:.4}, discounted {:.4}",
            seed,
            total_reward,
            discounted_return
        );

        Ok(EpisodeOutcome {
            seed,
            theta: human.theta().clone(),
            policy_index,
            trajectory,
            final_state: game.state().clone(),
            total_reward,
            discounted_return,
            discounted: game_config.is_discounted(),
        })
    }
}

/// Validate `config` and run one episode from `seed`
pub fn run_episode(config: &SimulationConfig, seed: u64) -> Result<EpisodeOutcome> {
    Simulator::new(config.clone())?.run_episode(seed)
}

/// Validate `config` and run `episodes` independent episodes in parallel
pub fn run_batch(config: &SimulationConfig, episodes: usize, base_seed: u64) -> Result<BatchReport> {
    Ok(Simulator::new(config.clone())?.run_batch(episodes, base_seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_config(max_t: usize, gamma: f64) -> SimulationConfig {
        let game = GameConfig {
            num_objects: 2,
            human_prod_cap: 4,
            robot_prod_cap: 1,
            delta: 0.0,
            max_t,
            gamma,
            ..GameConfig::default()
        };
        let space = Arc::new(ActionSpace::human(&game).unwrap());
        // [2, 2] from the two states the human ever sees in a 3-turn game
        let states = vec![State::zeros(2), State::new(vec![3.0, 3.0])];
        let policy = PolicyTable::deterministic(states, space, |_| 2).unwrap();
        SimulationConfig {
            game,
            human_policies: vec![Arc::new(policy)],
            // [1, 1]
            robot_rule: RobotRule::Fixed(2),
        }
    }

    #[test]
    fn test_alternating_turns() {
        let outcome = run_episode(&simple_config(3, 1.0), 17).unwrap();
        let actors: Vec<_> = outcome.trajectory.iter().map(|r| r.actor).collect();
        assert_eq!(actors, vec![AgentRole::Human, AgentRole::Robot, AgentRole::Human]);

        assert!(outcome.trajectory[0].robot_action.is_null());
        assert!(outcome.trajectory[1].human_action.is_null());
        assert_eq!(outcome.final_state, State::new(vec![5.0, 5.0]));
    }

    #[test]
    fn test_total_reward_matches_turn_rewards() {
        let outcome = run_episode(&simple_config(3, 1.0), 4).unwrap();
        let summed: f64 = outcome.trajectory.iter().map(|r| r.reward).sum();
        assert!((summed - outcome.total_reward).abs() < 1e-9);
        // Theta sums to 1 and every object gets 5 units
        assert!((outcome.total_reward - 5.0).abs() < 1e-9);
        assert_eq!(outcome.score(), outcome.total_reward);
    }

    #[test]
    fn test_discounting_is_applied_by_the_aggregator() {
        let outcome = run_episode(&simple_config(3, 0.5), 4).unwrap();
        let rewards: Vec<f64> = outcome.trajectory.iter().map(|r| r.reward).collect();
        let expected = rewards[0] + 0.5 * rewards[1] + 0.25 * rewards[2];
        assert!((outcome.discounted_return - expected).abs() < 1e-12);
        assert!((outcome.score() - expected).abs() < 1e-12);
        // Turn rewards themselves stay undiscounted
        assert!((rewards.iter().sum::<f64>() - outcome.total_reward).abs() < 1e-9);
    }

    #[test]
    fn test_state_outside_policy_aborts_episode() {
        // Policy covers only the start state, so turn 2 at [3, 3] has no row
        let mut config = simple_config(3, 1.0);
        let space = Arc::new(ActionSpace::human(&config.game).unwrap());
        let policy = PolicyTable::deterministic(vec![State::zeros(2)], space, |_| 2).unwrap();
        config.human_policies = vec![Arc::new(policy)];

        let result = run_episode(&config, 1);
        assert!(matches!(result, Err(CirlError::StateNotFound { .. })));
    }

    #[test]
    fn test_rejects_empty_policy_set() {
        let mut config = simple_config(3, 1.0);
        config.human_policies.clear();
        assert!(matches!(
            Simulator::new(config),
            Err(CirlError::Configuration(_))
        ));
    }

    #[test]
    fn test_outcome_theta_drives_rewards() {
        let outcome = run_episode(&simple_config(1, 1.0), 21).unwrap();
        // One human turn of [2, 2]
        let expected = 2.0 * outcome.theta.as_slice().iter().sum::<f64>();
        assert!((outcome.total_reward - expected).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_episode() {
        let config = simple_config(3, 1.0);
        let a = run_episode(&config, 99).unwrap();
        let b = run_episode(&config, 99).unwrap();
        assert_eq!(a, b);
    }
}
