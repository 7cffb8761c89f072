//! ActionSpace - the ordered, immutable set of legal actions for one agent

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::actions::compositions::compositions;
use crate::actions::subsets::robot_actions;
use crate::core::config::GameConfig;
use crate::core::error::{CirlError, Result};
use crate::core::types::ActionVector;

/// Ordered sequence of unique action vectors of a common length
///
/// Built once per agent configuration and shared read-only (usually behind an
/// `Arc`) by every agent and episode with that configuration.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    num_objects: usize,
    actions: Vec<ActionVector>,
    index: AHashMap<Vec<OrderedFloat<f64>>, usize>,
}

impl ActionSpace {
    /// Build a space from explicit actions, rejecting duplicates and length mismatches
    pub fn new(num_objects: usize, actions: Vec<ActionVector>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(actions.len());

        for (i, action) in actions.iter().enumerate() {
            if action.len() != num_objects {
                return Err(CirlError::Configuration(format!(
                    "action {} has {} entries, expected {}",
                    action,
                    action.len(),
                    num_objects
                )));
            }
            if action.as_slice().iter().any(|q| !q.is_finite() || *q < 0.0) {
                return Err(CirlError::Configuration(format!(
                    "action {} has a negative or non-finite quantity",
                    action
                )));
            }
            if index.insert(action.key(), i).is_some() {
                return Err(CirlError::Configuration(format!(
                    "duplicate action {} in action space",
                    action
                )));
            }
        }

        Ok(Self {
            num_objects,
            actions,
            index,
        })
    }

    /// The human's space: every composition of `human_prod_cap` into `num_objects` parts
    pub fn human(config: &GameConfig) -> Result<Self> {
        let actions = compositions(i64::from(config.human_prod_cap), config.num_objects as i64)
            .map(|counts| ActionVector::from_counts(&counts))
            .collect();
        Self::new(config.num_objects, actions)
    }

    /// The robot's space: equal production over every non-empty subset of types
    ///
    /// Every `q(m)` is positive, so each action has exactly `m` nonzero entries.
    pub fn robot(config: &GameConfig) -> Result<Self> {
        Self::new(config.num_objects, robot_actions(config)?)
    }

    pub fn num_objects(&self) -> usize {
        self.num_objects
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ActionVector> {
        self.actions.get(index)
    }

    pub fn actions(&self) -> &[ActionVector] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionVector> {
        self.actions.iter()
    }

    /// Position of an action by exact match
    pub fn index_of(&self, action: &ActionVector) -> Option<usize> {
        self.index.get(&action.key()).copied()
    }

    pub fn contains(&self, action: &ActionVector) -> bool {
        self.index_of(action).is_some()
    }

    /// Whether an agent with this space may take `action`
    ///
    /// The null action is always permitted, whatever the space holds.
    pub fn permits(&self, action: &ActionVector) -> bool {
        (action.len() == self.num_objects && action.is_null()) || self.contains(action)
    }

    /// The all-zero action of this space's width
    pub fn null_action(&self) -> ActionVector {
        ActionVector::zeros(self.num_objects)
    }
}
