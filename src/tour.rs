//! Tour representation: one chromosome of the genetic algorithm.

use crate::error::TspResult;
use crate::problem::Problem;
use std::cmp::Ordering;
use std::fmt;

/// A closed tour visiting every city exactly once.
///
/// The fitness is computed once at construction; any change to the gene
/// sequence goes through a new `Tour`. Callers are expected to pass a
/// permutation of the problem's city ids, which is not re-checked here.
#[derive(Clone)]
pub struct Tour {
    genes: Vec<usize>,
    fitness: f64,
}

impl Tour {
    /// Create a new tour and evaluate it against the problem.
    pub fn new(genes: Vec<usize>, problem: &Problem) -> TspResult<Self> {
        let distance = problem.tour_length(&genes)?;
        let fitness = if distance > 0.0 { 1.0 / distance } else { 0.0 };

        Ok(Tour { genes, fitness })
    }

    /// The ordered sequence of city ids.
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// Inverse of the total distance, or 0 for a zero-length tour.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Total cyclic distance; infinite when the fitness is 0.
    pub fn total_distance(&self) -> f64 {
        if self.fitness > 0.0 {
            1.0 / self.fitness
        } else {
            f64::INFINITY
        }
    }

    /// Number of cities in the tour.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Orders two tours so that the fitter one comes first.
    pub fn cmp_by_fitness_desc(a: &Tour, b: &Tour) -> Ordering {
        b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal)
    }
}

impl fmt::Debug for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tour")
            .field("distance", &self.total_distance())
            .field("genes", &self.genes)
            .finish()
    }
}
