//! Episode and batch simulation of the production game

pub mod batch;
pub mod episode;
pub mod reachable;
pub mod scenario;
pub mod theta;

pub use batch::{episode_seeds, BatchReport, EpisodeFailure, EpisodeSummary};
pub use episode::{
    run_batch, run_episode, EpisodeOutcome, SimulationConfig, Simulator, TurnRecord,
};
pub use reachable::{decision_states, reachable_states, ReachableStates};
pub use scenario::{random_human_policies, RobotRuleSpec, ScenarioFile};
pub use theta::draw_theta;
