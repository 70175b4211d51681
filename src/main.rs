//! Command line runner: solves one or more TSPLIB instances.

use clap::{Parser, ValueEnum};
use ga_tsp::config::Config;
use ga_tsp::problem::Problem;
use ga_tsp::utils::{save_tour, RunStatistics};
use ga_tsp::EvolutionEngine;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Instances at or below this size get 2-opt/3-opt in `auto` mode.
const AUTO_LOCAL_SEARCH_MAX_CITIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LocalSearchMode {
    /// Refine only instances with at most 100 cities
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TSPLIB instance files (EUC_2D or ATT)
    #[arg(required = true)]
    instances: Vec<PathBuf>,

    /// JSON configuration file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    population_size: Option<usize>,

    #[arg(long)]
    max_generations: Option<usize>,

    #[arg(long)]
    stagnation_limit: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// When to refine the best tour with 2-opt and 3-opt
    #[arg(long, value_enum, default_value_t = LocalSearchMode::Auto)]
    local_search: LocalSearchMode,

    /// Directory receiving one TSPLIB tour file per instance
    #[arg(long)]
    tour_dir: Option<PathBuf>,

    /// Print the run summaries as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Args {
    fn base_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::new(),
        };

        if let Some(size) = self.population_size {
            config = config.with_population_size(size);
        }
        if let Some(generations) = self.max_generations {
            config = config.with_max_generations(generations);
        }
        if let Some(limit) = self.stagnation_limit {
            config = config.with_stagnation_limit(limit);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        Ok(config)
    }
}

fn solve(
    path: &Path,
    config: &Config,
    args: &Args,
) -> Result<RunStatistics, Box<dyn std::error::Error>> {
    info!("loading problem from: {}", path.display());
    let problem = Problem::from_file(path)?;
    info!(
        "loaded problem: {} with {} cities ({})",
        problem.name, problem.dimension, problem.edge_weight_type
    );

    let use_local_search = match args.local_search {
        LocalSearchMode::Auto => problem.dimension <= AUTO_LOCAL_SEARCH_MAX_CITIES,
        LocalSearchMode::Always => true,
        LocalSearchMode::Never => false,
    };
    let config = config.clone().with_local_search(use_local_search);

    let mut engine = EvolutionEngine::new(problem, config);
    let best = engine.run()?.clone();

    if let Some(dir) = &args.tour_dir {
        let output_path = dir.join(format!("{}.tour", engine.problem.name));
        info!("saving tour to: {}", output_path.display());
        save_tour(&best, &engine.problem, &output_path)?;
    }

    engine
        .statistics()
        .ok_or_else(|| "engine finished without statistics".into())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match args.base_config() {
        Ok(config) => config,
        Err(err) => {
            error!("cannot read configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut results = Vec::with_capacity(args.instances.len());
    for path in &args.instances {
        match solve(path, &config, &args) {
            Ok(stats) => results.push(stats),
            Err(err) => {
                error!("{}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        }
    }

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                error!("cannot serialize results: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!();
        println!("{}", RunStatistics::table_header());
        println!("{}", "-".repeat(70));
        for stats in &results {
            println!("{}", stats.table_row());
        }
    }

    ExitCode::SUCCESS
}
