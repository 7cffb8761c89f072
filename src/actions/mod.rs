//! Action space generation
//!
//! Each agent's legal actions are enumerated once from the game configuration:
//! the human by bounded compositions, the robot by equal production over
//! subsets of object types.

pub mod compositions;
pub mod space;
pub mod subsets;

pub use compositions::{binomial, composition_count, compositions, Compositions};
pub use space::ActionSpace;
pub use subsets::{robot_actions, Combinations};
