//! PolicyTable - validated stochastic policy over an enumerated state list
//!
//! A policy table maps each state in `state_list` to a categorical
//! distribution (one `lookup_table` row) over the indices of `action_list`.
//! All structural checks happen in the constructor, so a table that exists
//! is always safe to sample from.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::actions::ActionSpace;
use crate::core::error::{CirlError, Result};
use crate::core::types::{ActionVector, State};
use crate::policy::sampling::sample_index;

/// Largest accepted deviation of a row sum from 1
pub const ROW_SUM_TOLERANCE: f64 = 1e-8;

/// Row-stochastic lookup table from states to action distributions
#[derive(Debug, Clone)]
pub struct PolicyTable {
    state_list: Vec<State>,
    action_list: Arc<ActionSpace>,
    lookup_table: Vec<Vec<f64>>,
    state_index: AHashMap<Vec<OrderedFloat<f64>>, usize>,
}

impl PolicyTable {
    /// Build a table, rejecting any malformed input
    ///
    /// Shape problems (row count, row width, state length, duplicate states)
    /// are configuration errors; bad probabilities (negative or non-finite
    /// entries, rows not summing to 1) are validation errors.
    pub fn new(
        state_list: Vec<State>,
        action_list: Arc<ActionSpace>,
        lookup_table: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if state_list.len() != lookup_table.len() {
            return Err(CirlError::Configuration(format!(
                "policy has {} states but {} lookup rows",
                state_list.len(),
                lookup_table.len()
            )));
        }

        let num_objects = action_list.num_objects();
        let mut state_index = AHashMap::with_capacity(state_list.len());
        for (i, state) in state_list.iter().enumerate() {
            if state.len() != num_objects {
                return Err(CirlError::Configuration(format!(
                    "policy state {} has {} entries, expected {}",
                    state,
                    state.len(),
                    num_objects
                )));
            }
            if state_index.insert(state.key(), i).is_some() {
                return Err(CirlError::Configuration(format!(
                    "duplicate state {} in policy state list",
                    state
                )));
            }
        }

        for (row, probabilities) in lookup_table.iter().enumerate() {
            if probabilities.len() != action_list.len() {
                return Err(CirlError::Configuration(format!(
                    "lookup row {} has {} entries but the action list has {}",
                    row,
                    probabilities.len(),
                    action_list.len()
                )));
            }
            validate_row(row, probabilities)?;
        }

        Ok(Self {
            state_list,
            action_list,
            lookup_table,
            state_index,
        })
    }

    /// Uniform distribution over every action in every state
    pub fn uniform(state_list: Vec<State>, action_list: Arc<ActionSpace>) -> Result<Self> {
        if action_list.is_empty() {
            return Err(CirlError::Configuration(
                "cannot build a uniform policy over an empty action list".into(),
            ));
        }
        let p = 1.0 / action_list.len() as f64;
        let rows = vec![vec![p; action_list.len()]; state_list.len()];
        Self::new(state_list, action_list, rows)
    }

    /// Point-mass policy: `choose` names the action index taken in each state
    pub fn deterministic<F>(
        state_list: Vec<State>,
        action_list: Arc<ActionSpace>,
        mut choose: F,
    ) -> Result<Self>
    where
        F: FnMut(&State) -> usize,
    {
        let width = action_list.len();
        let rows = state_list
            .iter()
            .map(|state| {
                let index = choose(state);
                if index >= width {
                    return Err(CirlError::Configuration(format!(
                        "action index {} out of range for {} actions",
                        index, width
                    )));
                }
                let mut row = vec![0.0; width];
                row[index] = 1.0;
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(state_list, action_list, rows)
    }

    /// Random full-support policy: each row is normalised uniform weights
    pub fn random<R: Rng + ?Sized>(
        state_list: Vec<State>,
        action_list: Arc<ActionSpace>,
        rng: &mut R,
    ) -> Result<Self> {
        let width = action_list.len();
        let rows = state_list
            .iter()
            .map(|_| {
                // (0, 1] so every action keeps some mass
                let weights: Vec<f64> = (0..width).map(|_| 1.0 - rng.gen::<f64>()).collect();
                let total: f64 = weights.iter().sum();
                weights.into_iter().map(|w| w / total).collect()
            })
            .collect();
        Self::new(state_list, action_list, rows)
    }

    /// Sample an action for `state`
    ///
    /// Fails with [`CirlError::StateNotFound`] when `state` is not in the
    /// table's state list; there is no fallback distribution.
    pub fn get_action<R: Rng + ?Sized>(&self, state: &State, rng: &mut R) -> Result<ActionVector> {
        let index = self.sample_action_index(state, rng)?;
        self.action_list
            .get(index)
            .cloned()
            .ok_or_else(|| CirlError::Configuration(format!("action index {} out of range", index)))
    }

    /// Sample an index into the action list for `state`
    pub fn sample_action_index<R: Rng + ?Sized>(&self, state: &State, rng: &mut R) -> Result<usize> {
        let row = self.distribution(state)?;
        // Validated rows always carry mass, so the draw cannot come back empty
        sample_index(rng, row).ok_or_else(|| CirlError::Validation {
            row: self.state_index[&state.key()],
            reason: "row has no probability mass".into(),
        })
    }

    /// The action distribution for `state`
    pub fn distribution(&self, state: &State) -> Result<&[f64]> {
        let row = self
            .state_index
            .get(&state.key())
            .ok_or_else(|| CirlError::StateNotFound {
                state: state.to_string(),
            })?;
        Ok(&self.lookup_table[*row])
    }

    pub fn contains_state(&self, state: &State) -> bool {
        self.state_index.contains_key(&state.key())
    }

    pub fn num_states(&self) -> usize {
        self.state_list.len()
    }

    pub fn state_list(&self) -> &[State] {
        &self.state_list
    }

    pub fn action_list(&self) -> &Arc<ActionSpace> {
        &self.action_list
    }

    pub fn lookup_table(&self) -> &[Vec<f64>] {
        &self.lookup_table
    }

    /// Serializable form of this table (the action list is implied by the game)
    pub fn to_spec(&self) -> PolicySpec {
        PolicySpec {
            name: None,
            state_list: self.state_list.clone(),
            lookup_table: self.lookup_table.clone(),
        }
    }
}

fn validate_row(row: usize, probabilities: &[f64]) -> Result<()> {
    if let Some(&p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(CirlError::Validation {
            row,
            reason: format!("entry {} is negative or not finite", p),
        });
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(CirlError::Validation {
            row,
            reason: format!("row sums to {} instead of 1", sum),
        });
    }
    Ok(())
}

/// On-disk policy: states and rows, validated against an action space on load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub state_list: Vec<State>,
    pub lookup_table: Vec<Vec<f64>>,
}

impl PolicySpec {
    /// Validate against the agent's action space and build the table
    pub fn into_table(self, action_list: Arc<ActionSpace>) -> Result<PolicyTable> {
        PolicyTable::new(self.state_list, action_list, self.lookup_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_object_space() -> Arc<ActionSpace> {
        let config = GameConfig {
            num_objects: 2,
            human_prod_cap: 2,
            ..GameConfig::default()
        };
        // [0,2], [1,1], [2,0]
        Arc::new(ActionSpace::human(&config).unwrap())
    }

    fn states() -> Vec<State> {
        vec![State::zeros(2), State::new(vec![1.0, 1.0])]
    }

    #[test]
    fn test_accepts_row_stochastic() {
        let table = PolicyTable::new(
            states(),
            two_object_space(),
            vec![vec![0.2, 0.3, 0.5], vec![0.0, 1.0, 0.0]],
        )
        .unwrap();
        assert_eq!(table.num_states(), 2);
        assert_eq!(table.distribution(&State::zeros(2)).unwrap(), &[0.2, 0.3, 0.5]);
    }

    #[test]
    fn test_rejects_negative_entry() {
        let result = PolicyTable::new(
            states(),
            two_object_space(),
            vec![vec![0.5, 0.6, -0.1], vec![0.0, 1.0, 0.0]],
        );
        assert!(matches!(result, Err(CirlError::Validation { row: 0, .. })));
    }

    #[test]
    fn test_rejects_rows_off_by_a_tenth() {
        for bad in [vec![0.3, 0.3, 0.3], vec![0.5, 0.3, 0.3]] {
            let result = PolicyTable::new(
                states(),
                two_object_space(),
                vec![vec![1.0, 0.0, 0.0], bad],
            );
            assert!(matches!(result, Err(CirlError::Validation { row: 1, .. })));
        }
    }

    #[test]
    fn test_accepts_rounding_within_tolerance() {
        let third = 1.0 / 3.0;
        let table = PolicyTable::new(
            vec![State::zeros(2)],
            two_object_space(),
            vec![vec![third, third, third]],
        );
        assert!(table.is_ok());
    }

    #[test]
    fn test_rejects_shape_errors() {
        let short_row = PolicyTable::new(states(), two_object_space(), vec![vec![1.0], vec![1.0]]);
        assert!(matches!(short_row, Err(CirlError::Configuration(_))));

        let missing_row = PolicyTable::new(states(), two_object_space(), vec![vec![1.0, 0.0, 0.0]]);
        assert!(matches!(missing_row, Err(CirlError::Configuration(_))));

        let duplicate_state = PolicyTable::uniform(
            vec![State::zeros(2), State::zeros(2)],
            two_object_space(),
        );
        assert!(matches!(duplicate_state, Err(CirlError::Configuration(_))));
    }

    #[test]
    fn test_unknown_state_is_an_error() {
        let table = PolicyTable::uniform(states(), two_object_space()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = table.get_action(&State::new(vec![5.0, 0.0]), &mut rng);
        assert!(matches!(result, Err(CirlError::StateNotFound { .. })));
    }

    #[test]
    fn test_deterministic_policy() {
        let table = PolicyTable::deterministic(states(), two_object_space(), |_| 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let action = table.get_action(&State::zeros(2), &mut rng).unwrap();
            assert_eq!(action, ActionVector::from_counts(&[1, 1]));
        }
    }

    #[test]
    fn test_random_policy_is_valid_and_seeded() {
        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        let ta = PolicyTable::random(states(), two_object_space(), &mut a).unwrap();
        let tb = PolicyTable::random(states(), two_object_space(), &mut b).unwrap();
        assert_eq!(ta.lookup_table(), tb.lookup_table());
        assert!(ta.lookup_table().iter().flatten().all(|&p| p > 0.0));
    }

    #[test]
    fn test_spec_roundtrip_through_toml() {
        let table = PolicyTable::uniform(states(), two_object_space()).unwrap();
        let text = toml::to_string(&table.to_spec()).unwrap();
        let spec: PolicySpec = toml::from_str(&text).unwrap();
        let rebuilt = spec.into_table(two_object_space()).unwrap();
        assert_eq!(rebuilt.lookup_table(), table.lookup_table());
    }
}
