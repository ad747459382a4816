//! Property tests for the colony invariants.

use super::*;
use proptest::prelude::*;
use u_numflow::random::create_rng;

/// Random valid distance matrix with 2..=max_n nodes.
fn distance_matrix(max_n: usize) -> impl Strategy<Value = DistanceMatrix> {
    (2..=max_n).prop_flat_map(|n| {
        prop::collection::vec(0.5f64..100.0, n * (n - 1) / 2).prop_map(move |upper| {
            let mut it = upper.into_iter();
            let mut rows = vec![vec![0.0; n]; n];
            for i in 0..n {
                for j in (i + 1)..n {
                    let d = it.next().unwrap_or(1.0);
                    rows[i][j] = d;
                    rows[j][i] = d;
                }
            }
            DistanceMatrix::new(rows).expect("generated matrix is valid")
        })
    })
}

fn config_strategy() -> impl Strategy<Value = AcoConfig> {
    (
        1usize..6,
        0.0f64..4.0,
        0.0f64..4.0,
        0.0f64..0.99,
        0.0f64..10.0,
        any::<u64>(),
        prop_oneof![Just(LengthMode::OpenPath), Just(LengthMode::ClosedTour)],
    )
        .prop_map(|(agents, alpha, beta, rho, q, seed, mode)| {
            AcoConfig::default()
                .with_num_agents(agents)
                .with_alpha(alpha)
                .with_beta(beta)
                .with_rho(rho)
                .with_q(q)
                .with_length_mode(mode)
                .with_seed(seed)
        })
}

fn initial_field(n: usize, config: &AcoConfig) -> PheromoneField {
    PheromoneField::uniform(
        n,
        config.initial_pheromone,
        config.min_pheromone,
        config.max_pheromone,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_distance_matrix_invariants(d in distance_matrix(8)) {
        for i in 0..d.len() {
            prop_assert_eq!(d.get(i, i), 0.0);
            for j in 0..d.len() {
                prop_assert_eq!(d.get(i, j), d.get(j, i));
                if i != j {
                    prop_assert!(d.get(i, j) > 0.0);
                }
            }
        }
    }

    #[test]
    fn prop_built_trails_are_permutations(
        d in distance_matrix(10),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let tau = initial_field(d.len(), &config);
        let selector = MoveSelector::new(&d, &tau, &config);
        let mut rng = create_rng(seed);
        for _ in 0..4 {
            let trail = build_trail_random_start(&selector, &mut rng);
            prop_assert!(is_permutation(trail.nodes(), d.len()));
        }
    }

    #[test]
    fn prop_probabilities_normalized(
        d in distance_matrix(10),
        config in config_strategy(),
        seed in any::<u64>(),
    ) {
        let n = d.len();
        let tau = initial_field(n, &config);
        let selector = MoveSelector::new(&d, &tau, &config);

        // random partial trail: current node plus some visited nodes
        let mut rng = create_rng(seed);
        let order = random_trail(0, n, &mut rng);
        let visited_count = 1 + (seed as usize % (n - 1));
        let mut visited = vec![false; n];
        for &v in &order.nodes()[..visited_count] {
            visited[v] = true;
        }
        let current = order.nodes()[visited_count - 1];

        let probs = selector.move_probabilities(current, &visited);
        let sum: f64 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
        prop_assert_eq!(probs[current], 0.0);
        for i in 0..n {
            if visited[i] {
                prop_assert_eq!(probs[i], 0.0);
            } else {
                prop_assert!(probs[i] > 0.0);
            }
        }
    }

    #[test]
    fn prop_update_keeps_field_clamped_and_symmetric(
        d in distance_matrix(8),
        config in config_strategy(),
        seed in any::<u64>(),
        rounds in 1usize..8,
    ) {
        let n = d.len();
        let mut tau = initial_field(n, &config);
        let mut rng = create_rng(seed);
        for _ in 0..rounds {
            let generation: Vec<Trail> = {
                let selector = MoveSelector::new(&d, &tau, &config);
                (0..config.num_agents)
                    .map(|_| build_trail_random_start(&selector, &mut rng))
                    .collect()
            };
            update_pheromones(&mut tau, &generation, &d, &config);
        }

        let (min, max) = tau.bounds();
        for i in 0..n {
            for j in 0..n {
                let v = tau.get(i, j);
                prop_assert!(v >= min && v <= max);
                prop_assert_eq!(v, tau.get(j, i));
            }
        }
    }

    #[test]
    fn prop_zero_deposit_is_geometric_decay(
        d in distance_matrix(6),
        rho in 0.0f64..0.99,
        k in 1i32..40,
    ) {
        let config = AcoConfig::default().with_rho(rho).with_q(0.0).with_initial_pheromone(1.0);
        let mut tau = initial_field(d.len(), &config);
        let generation = vec![random_trail(0, d.len(), &mut create_rng(0))];
        for _ in 0..k {
            update_pheromones(&mut tau, &generation, &d, &config);
        }
        let expected = (1.0 * (1.0 - rho).powi(k)).max(config.min_pheromone);
        let got = tau.get(0, 1);
        prop_assert!((got - expected).abs() <= expected * 1e-9, "{} vs {}", got, expected);
    }

    #[test]
    fn prop_best_of_is_lower_bound(
        d in distance_matrix(9),
        config in config_strategy(),
    ) {
        let mut rng = create_rng(config.seed.unwrap_or(0));
        let generation: Vec<Trail> = (0..config.num_agents)
            .map(|_| random_trail(0, d.len(), &mut rng))
            .collect();
        let (idx, cost) = best_of(&generation, &d, config.length_mode).unwrap();
        prop_assert!(idx < generation.len());
        for t in &generation {
            prop_assert!(cost <= evaluate_trail(t, &d, config.length_mode));
        }
    }

    #[test]
    fn prop_run_best_never_increases(
        d in distance_matrix(9),
        config in config_strategy(),
    ) {
        let config = config.with_max_iterations(15);
        let result = AcoRunner::run(&d, &config).unwrap();
        prop_assert!(is_permutation(result.best.nodes(), d.len()));
        prop_assert_eq!(result.best_cost, evaluate_trail(&result.best, &d, config.length_mode));
        for w in result.cost_history.windows(2) {
            prop_assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn prop_same_seed_same_run(
        d in distance_matrix(8),
        config in config_strategy(),
    ) {
        let config = config.with_max_iterations(10);
        let a = AcoRunner::run(&d, &config).unwrap();
        let b = AcoRunner::run(&d, &config).unwrap();
        prop_assert_eq!(a.best, b.best);
        prop_assert_eq!(a.best_cost, b.best_cost);
        prop_assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn prop_two_nodes_single_cost(
        dist in 0.1f64..50.0,
        config in config_strategy(),
    ) {
        let d = DistanceMatrix::new(vec![vec![0.0, dist], vec![dist, 0.0]]).unwrap();
        let config = config.with_max_iterations(3).with_length_mode(LengthMode::OpenPath);
        let result = AcoRunner::run(&d, &config).unwrap();
        prop_assert!(result.best.nodes() == [0, 1] || result.best.nodes() == [1, 0]);
        prop_assert_eq!(result.best_cost, dist);
    }
}
