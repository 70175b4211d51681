//! Population management for the genetic algorithm.

use crate::error::TspResult;
use crate::problem::Problem;
use crate::tour::Tour;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{seq::SliceRandom, Rng};

/// A generation of tours, always kept sorted from fittest to least fit.
#[derive(Debug, Clone)]
pub struct Population {
    tours: Vec<Tour>,
}

impl Population {
    /// Build a population from existing tours, sorting them by fitness.
    pub fn from_tours(mut tours: Vec<Tour>) -> Self {
        tours.sort_by(Tour::cmp_by_fitness_desc);
        Population { tours }
    }

    /// Initialize a population of random permutations of all city ids.
    pub fn random<R: Rng>(problem: &Problem, size: usize, rng: &mut R) -> TspResult<Self> {
        let city_ids = problem.city_ids();
        let mut tours = Vec::with_capacity(size);

        for _ in 0..size {
            let mut genes = city_ids.clone();
            genes.shuffle(rng);
            tours.push(Tour::new(genes, problem)?);
        }

        Ok(Self::from_tours(tours))
    }

    /// Get the population size.
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Tours from fittest to least fit.
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// The fittest tour of this generation.
    pub fn best(&self) -> Option<&Tour> {
        self.tours.first()
    }

    /// Select two parents with the same method, rank-based or roulette-wheel
    /// with equal odds. Each parent is then drawn independently.
    pub fn select_parents<R: Rng>(&self, rng: &mut R) -> (&Tour, &Tour) {
        if rng.gen_bool(0.5) {
            let parent1 = self.rank_based_selection(rng);
            let parent2 = self.rank_based_selection(rng);
            (parent1, parent2)
        } else {
            let parent1 = self.roulette_wheel_selection(rng);
            let parent2 = self.roulette_wheel_selection(rng);
            (parent1, parent2)
        }
    }

    /// Rank-based selection.
    ///
    /// Ranks run from 1 for the least fit tour up to N for the fittest, and a
    /// tour is drawn with probability proportional to its rank. Since the
    /// population is sorted best first, the tour at position `i` has rank `N - i`.
    pub fn rank_based_selection<R: Rng>(&self, rng: &mut R) -> &Tour {
        let n = self.tours.len();
        let ranks = (0..n).map(|position| n - position);

        match WeightedIndex::new(ranks) {
            Ok(dist) => &self.tours[dist.sample(rng)],
            Err(_) => &self.tours[rng.gen_range(0..n)],
        }
    }

    /// Roulette-wheel selection, proportional to raw fitness.
    ///
    /// Falls back to a uniform pick when the total fitness is zero.
    pub fn roulette_wheel_selection<R: Rng>(&self, rng: &mut R) -> &Tour {
        let total_fitness: f64 = self.tours.iter().map(Tour::fitness).sum();
        if total_fitness == 0.0 {
            return &self.tours[rng.gen_range(0..self.tours.len())];
        }

        let pick = rng.gen_range(0.0..total_fitness);
        let mut current = 0.0;
        for tour in &self.tours {
            current += tour.fitness();
            if current >= pick {
                return tour;
            }
        }

        &self.tours[self.tours.len() - 1]
    }
}
