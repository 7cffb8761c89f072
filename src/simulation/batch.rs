//! Monte Carlo batches of independent episodes
//!
//! Episode seeds are drawn up front from a master RNG, then episodes run in
//! parallel with rayon. Each episode owns its own RNG and `GameState`; action
//! spaces and policies are shared read-only. Results come back in episode
//! order, so a batch is reproducible from its base seed regardless of how
//! rayon schedules the work.

use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::EpisodeRng;
use crate::simulation::episode::{EpisodeOutcome, Simulator};

/// Compact per-episode record kept by a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub index: usize,
    pub seed: u64,
    pub policy_index: usize,
    pub score: f64,
    pub total_reward: f64,
    pub discounted_return: f64,
}

impl EpisodeSummary {
    fn from_outcome(index: usize, outcome: &EpisodeOutcome) -> Self {
        Self {
            index,
            seed: outcome.seed,
            policy_index: outcome.policy_index,
            score: outcome.score(),
            total_reward: outcome.total_reward,
            discounted_return: outcome.discounted_return,
        }
    }
}

/// An episode that aborted; the rest of the batch is unaffected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeFailure {
    pub index: usize,
    pub seed: u64,
    pub error: String,
}

/// Results of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub base_seed: u64,
    pub episodes: Vec<EpisodeSummary>,
    pub failures: Vec<EpisodeFailure>,
}

impl BatchReport {
    /// Scores of the successful episodes, in episode order
    pub fn rewards(&self) -> Vec<f64> {
        self.episodes.iter().map(|e| e.score).collect()
    }

    /// Monte Carlo estimate of the expected score
    pub fn mean(&self) -> Option<f64> {
        if self.episodes.is_empty() {
            return None;
        }
        Some(self.episodes.iter().map(|e| e.score).sum::<f64>() / self.episodes.len() as f64)
    }

    /// Sample standard deviation of the scores
    pub fn std_dev(&self) -> Option<f64> {
        let n = self.episodes.len();
        if n < 2 {
            return None;
        }
        let mean = self.mean()?;
        let var = self
            .episodes
            .iter()
            .map(|e| (e.score - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        Some(var.sqrt())
    }

    pub fn attempted(&self) -> usize {
        self.episodes.len() + self.failures.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} episodes ({} failed), mean score {:.4}, std dev {:.4}",
            self.attempted(),
            self.failures.len(),
            self.mean().unwrap_or(f64::NAN),
            self.std_dev().unwrap_or(f64::NAN),
        )
    }
}

/// The per-episode seeds a batch with `base_seed` uses
pub fn episode_seeds(base_seed: u64, episodes: usize) -> Vec<u64> {
    let mut master = EpisodeRng::seed_from_u64(base_seed);
    (0..episodes).map(|_| master.gen()).collect()
}

impl Simulator {
    /// Run `episodes` independent episodes in parallel
    pub fn run_batch(&self, episodes: usize, base_seed: u64) -> BatchReport {
        let seeds = episode_seeds(base_seed, episodes);

        // PARALLEL: episodes share nothing mutable
        let results: Vec<_> = seeds
            .par_iter()
            .enumerate()
            .map(|(index, &seed)| (index, seed, self.run_episode(seed)))
            .collect();

        let mut report = BatchReport {
            base_seed,
            episodes: Vec::with_capacity(episodes),
            failures: Vec::new(),
        };

        for (index, seed, result) in results {
            match result {
                Ok(outcome) => report
                    .episodes
                    .push(EpisodeSummary::from_outcome(index, &outcome)),
                Err(e) => {
                    tracing::warn!("Episode {} (seed {}) aborted: {}", index, seed, e);
                    report.failures.push(EpisodeFailure {
                        index,
                        seed,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("Batch with base seed {}: {}", base_seed, report.summary());
        report
    }
}
