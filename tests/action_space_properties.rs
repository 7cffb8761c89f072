//! Property tests for action-space generation and reward bookkeeping

use ahash::AHashSet;
use cirl_production::actions::{binomial, composition_count, compositions, ActionSpace};
use cirl_production::core::{ActionVector, PreferenceVector};
use cirl_production::game::GameState;
use cirl_production::{CirlError, GameConfig, QuantityRounding};
use proptest::prelude::*;

fn robot_config(num_objects: usize, robot_prod_cap: u32, delta: f64) -> GameConfig {
    GameConfig {
        num_objects,
        robot_prod_cap,
        delta,
        ..GameConfig::default()
    }
}

proptest! {
    #[test]
    fn test_compositions_are_complete_and_distinct(n in 0i64..9, k in 1i64..5) {
        let all: Vec<Vec<u32>> = compositions(n, k).collect();
        prop_assert_eq!(all.len() as u128, composition_count(n as u64, k as u64));
        prop_assert_eq!(all.len() as u128, binomial((n + k - 1) as u64, (k - 1) as u64));

        let mut seen = AHashSet::new();
        for c in &all {
            prop_assert_eq!(c.len(), k as usize);
            prop_assert_eq!(c.iter().map(|&x| x as i64).sum::<i64>(), n);
            prop_assert!(seen.insert(c.clone()));
        }
    }

    #[test]
    fn test_compositions_in_lexicographic_order(n in 0i64..8, k in 1i64..5) {
        let all: Vec<Vec<u32>> = compositions(n, k).collect();
        for pair in all.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_robot_actions_have_equal_subset_quantities(
        num_objects in 1usize..7,
        cap in 1u32..5,
        delta in 0.0f64..3.0,
    ) {
        let config = robot_config(num_objects, cap, delta);
        let space = ActionSpace::robot(&config).unwrap();
        prop_assert_eq!(space.len(), (1usize << num_objects) - 1);

        let mut per_size = vec![0u128; num_objects + 1];
        for action in space.iter() {
            let m = action.nonzero_count();
            prop_assert!(m >= 1 && m <= num_objects);
            per_size[m] += 1;

            let q = config.robot_quantity(m).unwrap();
            for &x in action.as_slice() {
                prop_assert!(x == 0.0 || x == q);
            }
        }
        for m in 1..=num_objects {
            prop_assert_eq!(per_size[m], binomial(num_objects as u64, m as u64));
        }
    }

    #[test]
    fn test_penalised_robot_spaces_are_valid_or_rejected(
        num_objects in 2usize..6,
        cap in 1u32..4,
        delta in -4.0f64..0.0,
        floor in any::<bool>(),
    ) {
        let config = GameConfig {
            quantity_rounding: if floor {
                QuantityRounding::Floor
            } else {
                QuantityRounding::Exact
            },
            ..robot_config(num_objects, cap, delta)
        };

        match config.validate() {
            Ok(()) => {
                let space = ActionSpace::robot(&config).unwrap();
                for action in space.iter() {
                    let m = action.nonzero_count();
                    prop_assert!(m >= 1);
                    let q = config.robot_quantity(m).unwrap();
                    prop_assert!(q > 0.0);
                    prop_assert!(action.as_slice().iter().all(|&x| x == 0.0 || x == q));
                }
            }
            Err(e) => {
                prop_assert!(matches!(e, CirlError::Configuration(_)));
                prop_assert!(ActionSpace::robot(&config).is_err());
            }
        }
    }

    #[test]
    fn test_total_reward_is_linear(
        weights in prop::collection::vec(1u32..=10, 3),
        picks in prop::collection::vec(0usize..15, 1..12),
    ) {
        let config = GameConfig {
            num_objects: 3,
            human_prod_cap: 4,
            ..GameConfig::default()
        };
        let space = ActionSpace::human(&config).unwrap();
        let theta = PreferenceVector::from_weights(&weights).unwrap();
        let mut game = GameState::new(theta);

        let mut summed = 0.0;
        for (t, &pick) in picks.iter().enumerate() {
            let action = space.get(pick % space.len()).unwrap().clone();
            let null = ActionVector::zeros(3);
            summed += if t % 2 == 0 {
                game.respond(&action, &null).unwrap()
            } else {
                game.respond(&null, &action).unwrap()
            };
        }
        prop_assert!((game.total_reward() - summed).abs() < 1e-9);
    }
}

#[test]
fn test_human_space_for_worked_example() {
    let config = GameConfig {
        num_objects: 2,
        human_prod_cap: 4,
        ..GameConfig::default()
    };
    let space = ActionSpace::human(&config).unwrap();
    let expected: Vec<ActionVector> = [[0, 4], [1, 3], [2, 2], [3, 1], [4, 0]]
        .iter()
        .map(|c| ActionVector::from_counts(c))
        .collect();
    assert_eq!(space.actions(), expected.as_slice());
}

#[test]
fn test_zero_robot_quantity_is_rejected_up_front() {
    // Exact: q(2) = 1 - 2 / 2 = 0
    let exact = robot_config(2, 1, -2.0);
    assert!(matches!(exact.validate(), Err(CirlError::Configuration(_))));
    assert!(ActionSpace::robot(&exact).is_err());

    // Floor: q(2) = 0.5 and q(3) = 1 - 2/3 both floor to 0
    let floored = GameConfig {
        quantity_rounding: QuantityRounding::Floor,
        ..robot_config(3, 1, -1.0)
    };
    assert!(matches!(floored.validate(), Err(CirlError::Configuration(_))));
    assert!(matches!(
        ActionSpace::robot(&floored),
        Err(CirlError::Configuration(_))
    ));
}

#[test]
fn test_robot_diversification_bonus() {
    // q(m) = 2 + (m - 1) * 3 / m: 2, 3.5, 4
    let config = robot_config(3, 2, 3.0);
    let space = ActionSpace::robot(&config).unwrap();
    assert_eq!(space.get(0), Some(&ActionVector::new(vec![2.0, 0.0, 0.0])));
    assert_eq!(space.get(3), Some(&ActionVector::new(vec![3.5, 3.5, 0.0])));
    assert_eq!(space.get(6), Some(&ActionVector::new(vec![4.0, 4.0, 4.0])));
}
