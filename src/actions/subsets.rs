//! Subset-based production enumeration (robot action space)
//!
//! The robot picks a non-empty subset of object types and makes the same
//! quantity `q(m)` of each, where `m` is the subset size. Actions are ordered
//! by subset size, then by subset in increasing-index lexicographic order.

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::ActionVector;

/// Lazy iterator over the `m`-subsets of `0..n` in lexicographic order
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    next: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, m: usize) -> Self {
        let next = (m <= n).then(|| (0..m).collect());
        Self { n, next }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let m = current.len();

        // Rightmost index that can still move right
        let pivot = (0..m).rev().find(|&i| current[i] < self.n - m + i);
        if let Some(i) = pivot {
            let mut next = current.clone();
            next[i] += 1;
            for j in i + 1..m {
                next[j] = next[j - 1] + 1;
            }
            self.next = Some(next);
        }

        Some(current)
    }
}

/// Every robot action for a configuration, in generation order
///
/// The count is `sum_{m=1}^{num_objects} C(num_objects, m) = 2^num_objects - 1`.
pub fn robot_actions(config: &GameConfig) -> Result<Vec<ActionVector>> {
    let n = config.num_objects;
    let mut actions = Vec::new();

    for m in 1..=n {
        let quantity = config.robot_quantity(m)?;
        for subset in Combinations::new(n, m) {
            let mut action = ActionVector::zeros(n);
            for index in subset {
                action.0[index] = quantity;
            }
            actions.push(action);
        }
    }

    Ok(actions)
}
