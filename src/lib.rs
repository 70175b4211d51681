//! # GA-TSP
//!
//! A genetic algorithm for the Traveling Salesman Problem with optional 2-opt
//! and 3-opt refinement of the final tour.
//!
//! Tours are permutations of city ids. Each generation keeps its fittest tour
//! (elitism) and fills the rest with children obtained by rank-based or
//! roulette-wheel selection, cycle crossover, and insert or random-slide
//! mutation. A run stops after a fixed number of generations or once the best
//! distance has not changed for a given number of generations.

pub mod config;
pub mod error;
pub mod genetic;
pub mod local_search;
pub mod population;
pub mod problem;
pub mod tour;
pub mod utils;

use crate::config::Config;
use crate::error::{TspError, TspResult};
use crate::genetic::Genetic;
use crate::local_search::LocalSearch;
use crate::population::Population;
use crate::problem::Problem;
use crate::tour::Tour;
use crate::utils::{improvement_percentage, RunStatistics};

use itertools::Itertools;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Lifecycle of an engine run. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Evolving,
    Terminated,
    Refining,
    Done,
}

/// Why the generation loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The generation cap was reached.
    MaxGenerations,
    /// The best distance stayed the same for `stagnation_limit` records.
    Stagnation,
}

/// The main algorithm structure that drives the generations.
pub struct EvolutionEngine {
    pub problem: Problem,
    pub config: Config,
    population: Population,
    best_tour: Option<Tour>,
    best_history: Vec<f64>,
    generation: usize,
    state: EngineState,
    termination_reason: Option<TerminationReason>,
    rng: ChaCha8Rng,
    seed: u64,
    genetic: Genetic,
    pub local_search: LocalSearch,
    pub run_time: Duration,
}

impl EvolutionEngine {
    /// Create a new engine for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);

        EvolutionEngine {
            problem,
            population: Population::from_tours(Vec::new()),
            best_tour: None,
            best_history: Vec::new(),
            generation: 0,
            state: EngineState::Initializing,
            termination_reason: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            genetic: Genetic,
            local_search: LocalSearch::new(),
            run_time: Duration::from_secs(0),
            config,
        }
    }

    /// Initialize the population with random tours and record the first best distance.
    pub fn initialize(&mut self) -> TspResult<()> {
        self.population =
            Population::random(&self.problem, self.config.population_size, &mut self.rng)?;
        self.generation = 0;
        self.best_history.clear();
        self.termination_reason = None;

        let best = self.population.best().cloned().ok_or(TspError::EmptyPopulation)?;
        self.best_history.push(best.total_distance());
        info!(
            "initial best distance for '{}': {:.2}",
            self.problem.name,
            best.total_distance()
        );
        self.best_tour = Some(best);
        self.state = EngineState::Evolving;

        Ok(())
    }

    /// Replace the current population with the next generation.
    pub fn next_generation(&mut self) -> TspResult<()> {
        let size = self.config.population_size;
        let mut next = Vec::with_capacity(size);

        let elite = self.population.best().cloned().ok_or(TspError::EmptyPopulation)?;
        next.push(elite);

        while next.len() < size {
            let (parent1, parent2) = self.population.select_parents(&mut self.rng);
            let (child1, child2) =
                self.genetic
                    .cycle_crossover(parent1, parent2, &self.problem)?;

            let mutation = self.genetic.choose_mutation(&mut self.rng);
            let child1 = self
                .genetic
                .mutate(mutation, &child1, &self.problem, &mut self.rng)?;
            let child2 = self
                .genetic
                .mutate(mutation, &child2, &self.problem, &mut self.rng)?;

            next.push(child1);
            if next.len() < size {
                next.push(child2);
            }
        }

        self.population = Population::from_tours(next);
        self.generation += 1;

        if let Some(top) = self.population.best() {
            let improved = self
                .best_tour
                .as_ref()
                .map_or(true, |best| top.fitness() > best.fitness());
            if improved {
                self.best_tour = Some(top.clone());
            }
        }

        let best_distance = self.best_distance();
        self.best_history.push(best_distance);

        if self.generation % 10 == 0 {
            debug!(
                "generation {}: best distance = {:.2}",
                self.generation, best_distance
            );
        }

        Ok(())
    }

    /// Check the termination criteria, generation cap first.
    ///
    /// A stagnation limit of 0 is met vacuously and stops the run right after
    /// initialization.
    pub fn should_terminate(
        &self,
        max_generations: usize,
        stagnation_limit: usize,
    ) -> Option<TerminationReason> {
        if self.generation >= max_generations {
            return Some(TerminationReason::MaxGenerations);
        }

        if self.best_history.len() >= stagnation_limit {
            let recent = &self.best_history[self.best_history.len() - stagnation_limit..];
            if recent.iter().all_equal() {
                return Some(TerminationReason::Stagnation);
            }
        }

        None
    }

    /// Run the algorithm with the termination settings from the configuration.
    pub fn run(&mut self) -> TspResult<&Tour> {
        self.run_with(
            self.config.max_generations,
            self.config.stagnation_limit,
            self.config.use_local_search,
        )
    }

    /// Run the algorithm until a termination criterion is met, then optionally refine.
    pub fn run_with(
        &mut self,
        max_generations: usize,
        stagnation_limit: usize,
        use_local_search: bool,
    ) -> TspResult<&Tour> {
        let start_time = Instant::now();
        info!(
            "solving '{}' ({} cities, population {}, seed {})",
            self.problem.name,
            self.problem.city_count(),
            self.config.population_size,
            self.seed
        );

        self.state = EngineState::Initializing;
        self.initialize()?;

        let reason = loop {
            if let Some(reason) = self.should_terminate(max_generations, stagnation_limit) {
                break reason;
            }
            self.next_generation()?;
        };
        self.termination_reason = Some(reason);
        self.state = EngineState::Terminated;

        match reason {
            TerminationReason::MaxGenerations => {
                info!("terminated: {} generations completed", self.generation)
            }
            TerminationReason::Stagnation => info!(
                "terminated: no improvement for {} generations",
                stagnation_limit
            ),
        }

        if use_local_search {
            self.state = EngineState::Refining;
            let best = self.best_tour.take().ok_or(TspError::EmptyPopulation)?;

            let best = self.local_search.two_opt(&best, &self.problem)?;
            info!("after 2-opt: {:.2}", best.total_distance());

            let best = self.local_search.three_opt(&best, &self.problem)?;
            info!(
                "after 3-opt: {:.2} ({} candidates, {} moves)",
                best.total_distance(),
                self.local_search.candidates_evaluated,
                self.local_search.moves_accepted
            );

            self.best_tour = Some(best);
            self.state = EngineState::Done;
        }

        self.run_time = start_time.elapsed();
        info!(
            "result: {} generations, best distance {:.2}",
            self.generation,
            self.best_distance()
        );

        self.best_tour.as_ref().ok_or(TspError::EmptyPopulation)
    }

    /// Best tour found so far.
    pub fn best_tour(&self) -> Option<&Tour> {
        self.best_tour.as_ref()
    }

    /// Distance of the best tour, infinite before initialization.
    pub fn best_distance(&self) -> f64 {
        self.best_tour
            .as_ref()
            .map_or(f64::INFINITY, Tour::total_distance)
    }

    /// Best distance recorded once per generation; index 0 is the initial population.
    pub fn best_history(&self) -> &[f64] {
        &self.best_history
    }

    /// Number of generations created so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination_reason
    }

    /// Seed used by the random source of this engine.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Summarize the last run. `None` before the engine has been initialized.
    pub fn statistics(&self) -> Option<RunStatistics> {
        let initial = *self.best_history.first()?;
        let best = self.best_distance();

        Some(RunStatistics {
            instance: self.problem.name.clone(),
            cities: self.problem.dimension,
            generations: self.generation,
            initial_distance: initial,
            best_distance: best,
            improvement: improvement_percentage(initial, best),
            local_search: self.state == EngineState::Done,
            runtime: self.run_time,
        })
    }
}
