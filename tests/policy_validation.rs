//! Integration tests for lookup-table policy construction and sampling

use std::sync::Arc;

use cirl_production::actions::ActionSpace;
use cirl_production::core::{EpisodeRng, State};
use cirl_production::policy::{PolicySpec, PolicyTable};
use cirl_production::{CirlError, GameConfig};
use proptest::prelude::*;
use rand::SeedableRng;

fn space() -> Arc<ActionSpace> {
    let config = GameConfig {
        num_objects: 2,
        human_prod_cap: 4,
        ..GameConfig::default()
    };
    Arc::new(ActionSpace::human(&config).unwrap())
}

fn states() -> Vec<State> {
    vec![State::zeros(2), State::new(vec![2.0, 3.0])]
}

proptest! {
    #[test]
    fn test_accepts_any_row_stochastic_table(
        raw in prop::collection::vec(prop::collection::vec(0.0f64..1.0, 5), 2),
    ) {
        let rows: Vec<Vec<f64>> = raw
            .into_iter()
            .map(|row| {
                let total: f64 = row.iter().sum::<f64>() + 1.0;
                // Extra mass on the last action keeps every row non-degenerate
                let mut row: Vec<f64> = row.iter().map(|w| w / total).collect();
                row[4] += 1.0 / total;
                row
            })
            .collect();
        let table = PolicyTable::new(states(), space(), rows);
        prop_assert!(table.is_ok());
    }
}

#[test]
fn test_rejects_negative_entry() {
    let rows = vec![vec![0.5, 0.7, -0.2, 0.0, 0.0], vec![0.2; 5]];
    let result = PolicyTable::new(states(), space(), rows);
    assert!(matches!(result, Err(CirlError::Validation { row: 0, .. })));
}

#[test]
fn test_rejects_rows_not_summing_to_one() {
    for total in [0.9, 1.1] {
        let rows = vec![vec![0.2; 5], vec![total / 5.0; 5]];
        let result = PolicyTable::new(states(), space(), rows);
        assert!(
            matches!(result, Err(CirlError::Validation { row: 1, .. })),
            "row summing to {} should be rejected",
            total
        );
    }
}

#[test]
fn test_rejects_shape_mismatch() {
    let rows = vec![vec![0.2; 5]];
    assert!(matches!(
        PolicyTable::new(states(), space(), rows),
        Err(CirlError::Configuration(_))
    ));
}

#[test]
fn test_unknown_state_has_no_fallback() {
    let table = PolicyTable::uniform(states(), space()).unwrap();
    let mut rng = EpisodeRng::seed_from_u64(1);
    let result = table.get_action(&State::new(vec![1.0, 1.0]), &mut rng);
    assert!(matches!(result, Err(CirlError::StateNotFound { .. })));
}

#[test]
fn test_sampling_follows_distribution() {
    let rows = vec![vec![0.0, 0.25, 0.0, 0.75, 0.0], vec![0.2; 5]];
    let table = PolicyTable::new(states(), space(), rows).unwrap();
    let mut rng = EpisodeRng::seed_from_u64(42);

    let mut counts = [0usize; 5];
    for _ in 0..4000 {
        let index = table.sample_action_index(&State::zeros(2), &mut rng).unwrap();
        counts[index] += 1;
    }
    assert_eq!(counts[0] + counts[2] + counts[4], 0);
    let share = counts[3] as f64 / 4000.0;
    assert!((share - 0.75).abs() < 0.05, "share of [3, 1] was {}", share);
}

#[test]
fn test_policy_spec_round_trip_through_toml() {
    let table = PolicyTable::deterministic(states(), space(), |s| {
        if s.as_slice()[0] > 0.0 {
            0
        } else {
            4
        }
    })
    .unwrap();

    let spec = table.to_spec();
    let text = toml::to_string(&spec).unwrap();
    let parsed: PolicySpec = toml::from_str(&text).unwrap();
    let rebuilt = parsed.into_table(space()).unwrap();
    assert_eq!(rebuilt.lookup_table(), table.lookup_table());
    assert_eq!(rebuilt.state_list(), table.state_list());
}
