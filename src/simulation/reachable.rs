//! Enumeration of the states an episode can visit
//!
//! Lookup-table policies have no fallback row, so a policy that should cover
//! every episode needs a `state_list` containing every state its agent can be
//! asked about. The walk applies actions the same way `GameState::respond`
//! does, so the resulting states hash identically to the ones seen in play.

use ahash::AHashSet;
use ordered_float::OrderedFloat;

use crate::actions::ActionSpace;
use crate::agent::AgentRole;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, State};

/// Upper bound on distinct states kept per turn before the walk gives up
pub const MAX_STATES_PER_TURN: usize = 1_000_000;

/// States at the start of each turn, in breadth-first discovery order
#[derive(Debug, Clone)]
pub struct ReachableStates {
    layers: Vec<Vec<State>>,
}

impl ReachableStates {
    /// Walk `horizon` alternating turns from the zero state
    ///
    /// The robot may also abstain (`RobotRule::Idle`), so its null action is
    /// expanded alongside its action space.
    pub fn explore(
        human_space: &ActionSpace,
        robot_space: &ActionSpace,
        horizon: usize,
    ) -> Result<Self> {
        if human_space.num_objects() != robot_space.num_objects() {
            return Err(CirlError::Configuration(format!(
                "human space has {} object types, robot space has {}",
                human_space.num_objects(),
                robot_space.num_objects()
            )));
        }

        let num_objects = human_space.num_objects();
        let null = ActionVector::zeros(num_objects);
        let mut layers: Vec<Vec<State>> = Vec::with_capacity(horizon);
        if horizon == 0 {
            return Ok(Self { layers });
        }
        layers.push(vec![State::zeros(num_objects)]);

        for t in 1..horizon {
            let (human_moves, robot_moves) = match AgentRole::for_turn(t - 1) {
                AgentRole::Human => (human_space.actions().to_vec(), vec![null.clone()]),
                AgentRole::Robot => (vec![null.clone()], with_null(robot_space, &null)),
            };

            let mut seen: AHashSet<Vec<OrderedFloat<f64>>> = AHashSet::new();
            let mut next = Vec::new();
            for state in &layers[t - 1] {
                for h in &human_moves {
                    for r in &robot_moves {
                        let produced = h.combined(r)?;
                        let successor = state.after(&produced)?;
                        if seen.insert(successor.key()) {
                            next.push(successor);
                        }
                    }
                }
                if next.len() > MAX_STATES_PER_TURN {
                    return Err(CirlError::Configuration(format!(
                        "more than {} reachable states at turn {}",
                        MAX_STATES_PER_TURN, t
                    )));
                }
            }

            tracing::trace!("Turn {}: {} reachable states", t, next.len());
            layers.push(next);
        }

        Ok(Self { layers })
    }

    pub fn horizon(&self) -> usize {
        self.layers.len()
    }

    /// States at the start of turn `t`
    pub fn at_turn(&self, t: usize) -> &[State] {
        self.layers.get(t).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every distinct state across all turns
    pub fn all(&self) -> Vec<State> {
        dedup(self.layers.iter())
    }

    /// Every distinct state `role` has to act in
    pub fn decision_states(&self, role: AgentRole) -> Vec<State> {
        dedup(
            self.layers
                .iter()
                .enumerate()
                .filter(|(t, _)| AgentRole::for_turn(*t) == role)
                .map(|(_, layer)| layer),
        )
    }
}

fn with_null(space: &ActionSpace, null: &ActionVector) -> Vec<ActionVector> {
    let mut moves = space.actions().to_vec();
    if !space.contains(null) {
        moves.push(null.clone());
    }
    moves
}

fn dedup<'a>(layers: impl Iterator<Item = &'a Vec<State>>) -> Vec<State> {
    let mut seen = AHashSet::new();
    layers
        .flatten()
        .filter(|s| seen.insert(s.key()))
        .cloned()
        .collect()
}

/// Every distinct state visited at the start of some turn within `horizon`
pub fn reachable_states(
    human_space: &ActionSpace,
    robot_space: &ActionSpace,
    horizon: usize,
) -> Result<Vec<State>> {
    Ok(ReachableStates::explore(human_space, robot_space, horizon)?.all())
}

/// Every distinct state in which `role` chooses an action within `horizon`
pub fn decision_states(
    human_space: &ActionSpace,
    robot_space: &ActionSpace,
    horizon: usize,
    role: AgentRole,
) -> Result<Vec<State>> {
    Ok(ReachableStates::explore(human_space, robot_space, horizon)?.decision_states(role))
}
