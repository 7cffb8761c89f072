//! Core type definitions used throughout the codebase

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{CirlError, Result};

/// A production quantity for a single object type
pub type Quantity = f64;

/// Turn index within an episode (0-based)
pub type Turn = usize;

/// The single random source owned by one episode
pub type EpisodeRng = rand_chacha::ChaCha8Rng;

/// Quantities produced by one agent in one turn, one entry per object type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionVector(pub Vec<Quantity>);

impl ActionVector {
    pub fn new(quantities: Vec<Quantity>) -> Self {
        Self(quantities)
    }

    /// The null action: produce nothing
    pub fn zeros(num_objects: usize) -> Self {
        Self(vec![0.0; num_objects])
    }

    /// Build from integer counts (compositions are generated as integers)
    pub fn from_counts(counts: &[u32]) -> Self {
        Self(counts.iter().map(|&c| c as Quantity).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Quantity] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&q| q == 0.0)
    }

    /// Total quantity produced across all object types
    pub fn total(&self) -> Quantity {
        self.0.iter().sum()
    }

    /// Number of object types with nonzero production
    pub fn nonzero_count(&self) -> usize {
        self.0.iter().filter(|&&q| q != 0.0).count()
    }

    /// Element-wise sum of two actions of equal length
    pub fn combined(&self, other: &ActionVector) -> Result<ActionVector> {
        ensure_same_len("action", self.len(), other.len())?;
        Ok(ActionVector(
            self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect(),
        ))
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        dot(&self.0, weights)
    }

    /// Hashable key for exact-match lookups
    pub fn key(&self) -> Vec<OrderedFloat<f64>> {
        self.0.iter().copied().map(OrderedFloat).collect()
    }
}

impl fmt::Display for ActionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_vector(f, &self.0)
    }
}

/// Cumulative production per object type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State(pub Vec<Quantity>);

impl State {
    pub fn new(quantities: Vec<Quantity>) -> Self {
        Self(quantities)
    }

    /// The initial state: nothing produced yet
    pub fn zeros(num_objects: usize) -> Self {
        Self(vec![0.0; num_objects])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Quantity] {
        &self.0
    }

    /// Add an action's production to the state
    pub fn accumulate(&mut self, action: &ActionVector) -> Result<()> {
        ensure_same_len("state", self.len(), action.len())?;
        for (total, q) in self.0.iter_mut().zip(action.as_slice()) {
            *total += q;
        }
        Ok(())
    }

    /// The state reached after applying `action`, leaving `self` untouched
    pub fn after(&self, action: &ActionVector) -> Result<State> {
        let mut next = self.clone();
        next.accumulate(action)?;
        Ok(next)
    }

    pub fn dot(&self, weights: &[f64]) -> f64 {
        dot(&self.0, weights)
    }

    /// Hashable key for exact-match lookups
    pub fn key(&self) -> Vec<OrderedFloat<f64>> {
        self.0.iter().copied().map(OrderedFloat).collect()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_vector(f, &self.0)
    }
}

impl From<Vec<Quantity>> for State {
    fn from(quantities: Vec<Quantity>) -> Self {
        Self(quantities)
    }
}

impl From<Vec<Quantity>> for ActionVector {
    fn from(quantities: Vec<Quantity>) -> Self {
        Self(quantities)
    }
}

/// The shared reward weights over object types (theta)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceVector(Vec<f64>);

impl PreferenceVector {
    /// Create a preference vector, rejecting negative or non-finite weights
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(CirlError::Configuration(
                "preference vector must cover at least one object type".into(),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(CirlError::Configuration(format!(
                "preference weight {} must be non-negative and finite",
                bad
            )));
        }
        Ok(Self(weights))
    }

    /// Normalise raw non-negative weights so they sum to 1
    pub fn from_weights(raw: &[u32]) -> Result<Self> {
        let total: u32 = raw.iter().sum();
        if total == 0 {
            return Err(CirlError::Configuration(
                "preference weights must not all be zero".into(),
            ));
        }
        Self::new(raw.iter().map(|&w| w as f64 / total as f64).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn dot(values: &[f64], weights: &[f64]) -> f64 {
    values.iter().zip(weights).map(|(v, w)| v * w).sum()
}

fn ensure_same_len(what: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(CirlError::Configuration(format!(
            "{} length mismatch: expected {} object types, got {}",
            what, expected, got
        )));
    }
    Ok(())
}

fn write_vector(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, "]")
}
