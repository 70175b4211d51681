//! Basic example of using the GA-TSP library.

use ga_tsp::config::Config;
use ga_tsp::problem::Problem;
use ga_tsp::utils::format_duration;
use ga_tsp::EvolutionEngine;
use std::env;

/// Ten cities on a circle, used when no instance path is given.
const DEMO_INSTANCE: &str = "NAME: circle10
TYPE: TSP
DIMENSION: 10
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 100 0
2 81 59
3 31 95
4 -31 95
5 -81 59
6 -100 0
7 -81 -59
8 -31 -95
9 31 -95
10 81 -59
EOF
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get instance path from command line or use the built-in instance
    let args: Vec<String> = env::args().collect();
    let problem = if args.len() > 1 {
        println!("Loading problem from: {}", args[1]);
        Problem::from_file(&args[1])?
    } else {
        Problem::from_tsplib_str(DEMO_INSTANCE)?
    };
    println!(
        "Loaded problem: {} with {} cities",
        problem.name, problem.dimension
    );

    let config = Config::new()
        .with_population_size(100)
        .with_max_generations(100)
        .with_stagnation_limit(5)
        .with_local_search(problem.dimension <= 100)
        .with_seed(7);

    let mut engine = EvolutionEngine::new(problem, config);
    let best = engine.run()?.clone();

    println!("Search completed in {}", format_duration(engine.run_time));
    println!("Generations: {}", engine.generation());
    println!("Best distance: {:.2}", best.total_distance());
    println!(
        "Best tour (first 20 cities): {:?}",
        &best.genes()[..best.len().min(20)]
    );

    // Print the recorded best distances at roughly ten evenly spaced generations
    let history = engine.best_history();
    let step = (engine.generation() / 10).max(1);
    for (generation, distance) in history.iter().enumerate().step_by(step) {
        println!("  Generation {:3}: {:8.2}", generation, distance);
    }

    Ok(())
}
