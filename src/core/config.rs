//! Game configuration with documented parameters
//!
//! Every parameter of a production game lives here, together with the rules
//! that make a configuration playable. Configurations load from TOML so
//! experiment drivers can keep them next to their scenario files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{CirlError, Result};
use crate::core::types::Quantity;

/// How the robot's per-type production quantity `q(m)` is resolved
///
/// `q(m) = robot_prod_cap + (m - 1) * delta / m` is rational in general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityRounding {
    /// Keep the rational value as-is
    #[default]
    Exact,
    /// Round down to the nearest integer
    Floor,
    /// Round half away from zero
    Nearest,
    /// Reject configurations where any `q(m)` is not an integer
    RequireIntegral,
}

impl QuantityRounding {
    /// Resolve a raw quantity under this policy
    pub fn apply(self, raw: Quantity) -> Result<Quantity> {
        match self {
            QuantityRounding::Exact => Ok(raw),
            QuantityRounding::Floor => Ok(raw.floor()),
            QuantityRounding::Nearest => Ok(raw.round()),
            QuantityRounding::RequireIntegral => {
                if (raw - raw.round()).abs() <= INTEGRAL_TOLERANCE {
                    Ok(raw.round())
                } else {
                    Err(CirlError::Configuration(format!(
                        "robot quantity {} is not integral and rounding is 'require_integral'",
                        raw
                    )))
                }
            }
        }
    }
}

/// Slack allowed when deciding whether a computed quantity is an integer
const INTEGRAL_TOLERANCE: f64 = 1e-9;

/// Configuration for one production game
///
/// The same configuration is shared by every episode of a batch; only theta,
/// the human policy and the action draws vary between episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of distinct object types that can be produced
    pub num_objects: usize,

    /// Exact number of items the human produces on each of its turns
    ///
    /// The human splits this total across object types in any way, so its
    /// action space holds every composition of `human_prod_cap` into
    /// `num_objects` parts.
    pub human_prod_cap: u32,

    /// Items of a single type the robot makes when it specialises
    pub robot_prod_cap: u32,

    /// Extra-item parameter for robot diversification
    ///
    /// Making `m` types at once yields `robot_prod_cap + (m-1)*delta/m` of
    /// each. Positive delta rewards diversification, negative penalises it.
    pub delta: f64,

    /// Number of turns in an episode (fixed horizon, no early termination)
    pub max_t: usize,

    /// Discount factor in (0, 1]; 1 means undiscounted
    pub gamma: f64,

    /// Rounding policy for the robot's per-type quantity
    pub quantity_rounding: QuantityRounding,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_objects: 2,
            human_prod_cap: 4,
            robot_prod_cap: 1,
            delta: 0.0,
            max_t: 10,
            gamma: 1.0,
            quantity_rounding: QuantityRounding::Exact,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether episode returns are discounted
    pub fn is_discounted(&self) -> bool {
        self.gamma < 1.0
    }

    /// Robot quantity per selected type when `m` types are made at once
    ///
    /// `m` must be at least 1. The result has already passed through
    /// [`QuantityRounding`] and is strictly positive.
    pub fn robot_quantity(&self, m: usize) -> Result<Quantity> {
        if m == 0 {
            return Err(CirlError::Configuration(
                "robot must select at least one object type".into(),
            ));
        }
        let m_f = m as f64;
        let raw = self.robot_prod_cap as f64 + (m_f - 1.0) * self.delta / m_f;
        let quantity = self.quantity_rounding.apply(raw)?;
        if quantity <= 0.0 {
            return Err(CirlError::Configuration(format!(
                "robot quantity for {} types must be positive, got {}; delta {} is too small",
                m, quantity, self.delta
            )));
        }
        Ok(quantity)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.num_objects == 0 {
            return Err(CirlError::Configuration(
                "num_objects must be positive".into(),
            ));
        }

        if self.human_prod_cap == 0 || self.robot_prod_cap == 0 {
            return Err(CirlError::Configuration(format!(
                "production caps must be positive (human {}, robot {})",
                self.human_prod_cap, self.robot_prod_cap
            )));
        }

        if self.max_t == 0 {
            return Err(CirlError::Configuration("max_t must be positive".into()));
        }

        if !self.delta.is_finite() {
            return Err(CirlError::Configuration(format!(
                "delta ({}) must be finite",
                self.delta
            )));
        }

        // (0, 1]: zero would erase every turn after the first
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(CirlError::Configuration(format!(
                "gamma ({}) must lie in (0, 1]",
                self.gamma
            )));
        }

        for m in 1..=self.num_objects {
            self.robot_quantity(m)?;
        }

        Ok(())
    }

    /// Parse and validate a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
