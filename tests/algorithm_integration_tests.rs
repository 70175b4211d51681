//! Integration tests for the full evolution engine.

use ga_tsp::config::Config;
use ga_tsp::problem::{City, EdgeWeightType, Problem};
use ga_tsp::utils::is_permutation_of;
use ga_tsp::{EngineState, EvolutionEngine, TerminationReason};

const SQUARE_INSTANCE: &str = "NAME: square4
TYPE: TSP
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 10
3 10 10
4 10 0
EOF
";

/// Creates a moderate size problem with 15 cities spread over two clusters.
fn create_moderate_problem() -> Problem {
    let mut cities = Vec::new();
    for id in 1..=15 {
        let offset = if id % 2 == 0 { 200.0 } else { 0.0 };
        let x = offset + (id as f64 * 37.0) % 100.0;
        let y = (id as f64 * 53.0) % 90.0;
        cities.push(City::new(id, x, y));
    }

    Problem::new("ModerateTestProblem".to_string(), EdgeWeightType::Euc2D, cities).unwrap()
}

#[test]
fn test_engine_initialization() {
    let problem = create_moderate_problem();
    let config = Config::new().with_population_size(20).with_seed(1);

    let mut engine = EvolutionEngine::new(problem, config);
    assert_eq!(engine.state(), EngineState::Initializing);
    assert!(engine.best_tour().is_none());

    engine.initialize().unwrap();

    assert_eq!(engine.state(), EngineState::Evolving);
    assert_eq!(engine.population().len(), 20);
    assert_eq!(engine.generation(), 0);
    assert_eq!(engine.best_history().len(), 1);

    let best = engine.best_tour().unwrap();
    assert_eq!(best.fitness(), engine.population().tours()[0].fitness());
    assert_eq!(engine.best_history()[0], best.total_distance());
}

#[test]
fn test_generation_keeps_size_and_elite() {
    let problem = create_moderate_problem();
    let city_ids = problem.city_ids();
    // Odd size so that the final pair of children gets truncated
    let config = Config::new().with_population_size(7).with_seed(2);

    let mut engine = EvolutionEngine::new(problem, config);
    engine.initialize().unwrap();

    for _ in 0..30 {
        let previous_top = engine.population().best().unwrap().clone();

        engine.next_generation().unwrap();

        assert_eq!(engine.population().len(), 7);
        let tours = engine.population().tours();
        assert!(tours
            .iter()
            .any(|tour| tour.genes() == previous_top.genes()));
        assert!(tours[0].fitness() >= previous_top.fitness());
        for tour in tours {
            assert!(is_permutation_of(tour.genes(), &city_ids));
        }
    }

    assert_eq!(engine.generation(), 30);
    assert_eq!(engine.best_history().len(), 31);
}

#[test]
fn test_best_history_is_monotonic() {
    let problem = create_moderate_problem();
    let config = Config::new().with_population_size(30).with_seed(3);

    let mut engine = EvolutionEngine::new(problem, config);
    engine.run_with(40, 50, false).unwrap();

    let history = engine.best_history();
    assert_eq!(history.len(), 41);
    for pair in history.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert_eq!(*history.last().unwrap(), engine.best_distance());
    assert_eq!(
        engine.termination_reason(),
        Some(TerminationReason::MaxGenerations)
    );
}

#[test]
fn test_termination_bound() {
    for max_generations in [0, 1, 5, 17] {
        let problem = create_moderate_problem();
        let config = Config::new()
            .with_population_size(10)
            .with_max_generations(max_generations)
            .with_stagnation_limit(3)
            .with_seed(4);

        let mut engine = EvolutionEngine::new(problem, config);
        engine.run().unwrap();

        assert!(engine.best_history().len() <= max_generations + 1);
        assert!(engine.generation() <= max_generations);
    }
}

#[test]
fn test_stagnation_terminates_run() {
    let problem = Problem::from_tsplib_str(SQUARE_INSTANCE).unwrap();
    let config = Config::new()
        .with_population_size(20)
        .with_max_generations(1000)
        .with_stagnation_limit(5)
        .with_seed(5);

    let mut engine = EvolutionEngine::new(problem, config);
    engine.run().unwrap();

    assert_eq!(
        engine.termination_reason(),
        Some(TerminationReason::Stagnation)
    );
    assert!(engine.generation() < 1000);

    let history = engine.best_history();
    assert!(history.len() >= 5);
    let recent = &history[history.len() - 5..];
    assert!(recent.iter().all(|&d| d == recent[0]));
}

#[test]
fn test_zero_stagnation_limit_stops_after_initialization() {
    let problem = create_moderate_problem();
    let config = Config::new().with_population_size(10).with_seed(12);

    let mut engine = EvolutionEngine::new(problem, config);
    engine.run_with(50, 0, false).unwrap();

    assert_eq!(engine.generation(), 0);
    assert_eq!(engine.best_history().len(), 1);
    assert_eq!(
        engine.termination_reason(),
        Some(TerminationReason::Stagnation)
    );
}

#[test]
fn test_square_converges_to_optimum() {
    let problem = Problem::from_tsplib_str(SQUARE_INSTANCE).unwrap();
    let config = Config::new()
        .with_population_size(10)
        .with_max_generations(50)
        .with_stagnation_limit(10)
        .with_local_search(true)
        .with_seed(6);

    let mut engine = EvolutionEngine::new(problem, config);
    let best = engine.run().unwrap();

    assert!((best.total_distance() - 40.0).abs() < 1e-9);
    assert_eq!(engine.state(), EngineState::Done);
}

#[test]
fn test_local_search_does_not_worsen_run_result() {
    let config = Config::new()
        .with_population_size(20)
        .with_max_generations(15)
        .with_stagnation_limit(20)
        .with_seed(7);

    let mut plain = EvolutionEngine::new(create_moderate_problem(), config.clone());
    let plain_distance = plain.run().unwrap().total_distance();
    assert_eq!(plain.state(), EngineState::Terminated);

    let mut refined = EvolutionEngine::new(create_moderate_problem(), config.with_local_search(true));
    let refined_distance = refined.run().unwrap().total_distance();

    // Same seed gives the same evolution; refinement only shortens the final tour
    assert_eq!(plain.best_history(), refined.best_history());
    assert!(refined_distance <= plain_distance);
    assert!(refined.local_search.candidates_evaluated > 0);
}

#[test]
fn test_same_seed_is_reproducible() {
    let config = Config::new()
        .with_population_size(16)
        .with_max_generations(25)
        .with_seed(8);

    let mut first = EvolutionEngine::new(create_moderate_problem(), config.clone());
    let first_genes = first.run().unwrap().genes().to_vec();

    let mut second = EvolutionEngine::new(create_moderate_problem(), config);
    let second_genes = second.run().unwrap().genes().to_vec();

    assert_eq!(first_genes, second_genes);
    assert_eq!(first.best_history(), second.best_history());
    assert_eq!(first.seed(), 8);
}

#[test]
fn test_att_instance_runs() {
    let content = "NAME: att5
DIMENSION: 5
EDGE_WEIGHT_TYPE: ATT
NODE_COORD_SECTION
1 6734 1453
2 2233 10
3 5530 1424
4 401 841
5 3082 1644
EOF
";
    let problem = Problem::from_tsplib_str(content).unwrap();
    let city_ids = problem.city_ids();
    let config = Config::new()
        .with_population_size(12)
        .with_max_generations(20)
        .with_local_search(true)
        .with_seed(9);

    let mut engine = EvolutionEngine::new(problem, config);
    let best = engine.run().unwrap().clone();

    assert!(is_permutation_of(best.genes(), &city_ids));
    // ATT distances are integers, so is their sum
    assert!((best.total_distance() - best.total_distance().round()).abs() < 1e-6);
}

#[test]
fn test_statistics_after_run() {
    let problem = create_moderate_problem();
    let config = Config::new()
        .with_population_size(10)
        .with_max_generations(10)
        .with_seed(10);

    let mut engine = EvolutionEngine::new(problem, config);
    assert!(engine.statistics().is_none());
    engine.run().unwrap();

    let stats = engine.statistics().unwrap();
    assert_eq!(stats.instance, "ModerateTestProblem");
    assert_eq!(stats.cities, 15);
    assert_eq!(stats.generations, engine.generation());
    assert_eq!(stats.initial_distance, engine.best_history()[0]);
    assert_eq!(stats.best_distance, engine.best_distance());
    assert!(stats.improvement >= 0.0);
    assert!(!stats.local_search);
}

#[test]
fn test_empty_population_is_an_error() {
    let problem = create_moderate_problem();
    let config = Config::new().with_population_size(0).with_seed(11);

    let mut engine = EvolutionEngine::new(problem, config);
    assert!(engine.run().is_err());
}
