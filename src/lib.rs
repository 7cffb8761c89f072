//! CIRL Production - a two-player cooperative production game
//!
//! A human who knows the shared preference vector theta and a robot who does
//! not alternate turns producing objects. Reward is linear in what gets
//! produced. The crate generates both action spaces, runs the human's
//! lookup-table policy and the robot's decision rule through fixed-horizon
//! episodes, and estimates expected return over seeded Monte Carlo batches.

pub mod actions;
pub mod agent;
pub mod core;
pub mod game;
pub mod policy;
pub mod simulation;

pub use crate::actions::ActionSpace;
pub use crate::agent::{Agent, AgentRole, Human, Robot, RobotRule};
pub use crate::core::{
    ActionVector, CirlError, GameConfig, PreferenceVector, QuantityRounding, Result, State,
};
pub use crate::game::GameState;
pub use crate::policy::{PolicySpec, PolicyTable};
pub use crate::simulation::{
    run_batch, run_episode, BatchReport, EpisodeOutcome, ScenarioFile, SimulationConfig,
    Simulator,
};
