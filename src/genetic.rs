//! Genetic operators: cycle crossover and the two mutation moves.

use crate::error::{TspError, TspResult};
use crate::problem::Problem;
use crate::tour::Tour;
use rand::Rng;
use std::collections::HashMap;

/// Mutation applied to both children of a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Insert,
    RandomSlide,
}

/// Implements the genetic operators (crossover, mutation) for the TSP.
pub struct Genetic;

impl Genetic {
    /// Perform cycle crossover (CX) between two parent tours.
    ///
    /// Positions are split into cycles in order of discovery. Even cycles keep
    /// each parent's values in its own child, odd cycles swap them, so both
    /// children stay permutations of the parents' city set.
    pub fn cycle_crossover(
        &self,
        parent1: &Tour,
        parent2: &Tour,
        problem: &Problem,
    ) -> TspResult<(Tour, Tour)> {
        let p1 = parent1.genes();
        let p2 = parent2.genes();
        let size = p1.len();

        let position_in_p1: HashMap<usize, usize> =
            p1.iter().enumerate().map(|(idx, &city)| (city, idx)).collect();

        let mut child1: Vec<Option<usize>> = vec![None; size];
        let mut child2: Vec<Option<usize>> = vec![None; size];
        let mut visited = vec![false; size];
        let mut cycle_count = 0;

        for start in 0..size {
            if visited[start] {
                continue;
            }

            let mut cycle = Vec::new();
            let mut current = start;
            while !visited[current] {
                visited[current] = true;
                cycle.push(current);
                let value_in_p2 = p2[current];
                current = *position_in_p1
                    .get(&value_in_p2)
                    .ok_or(TspError::UnknownCity(value_in_p2))?;
            }

            let swap = cycle_count % 2 == 1;
            for idx in cycle {
                if swap {
                    child1[idx] = Some(p2[idx]);
                    child2[idx] = Some(p1[idx]);
                } else {
                    child1[idx] = Some(p1[idx]);
                    child2[idx] = Some(p2[idx]);
                }
            }
            cycle_count += 1;
        }

        // Unreachable with a correct cycle partition.
        let child1_genes = child1
            .into_iter()
            .enumerate()
            .map(|(idx, gene)| gene.unwrap_or(p2[idx]))
            .collect();
        let child2_genes = child2
            .into_iter()
            .enumerate()
            .map(|(idx, gene)| gene.unwrap_or(p1[idx]))
            .collect();

        Ok((
            Tour::new(child1_genes, problem)?,
            Tour::new(child2_genes, problem)?,
        ))
    }

    /// Remove a random gene and reinsert it at a random index of the shortened sequence.
    pub fn insert_mutation<R: Rng>(
        &self,
        tour: &Tour,
        problem: &Problem,
        rng: &mut R,
    ) -> TspResult<Tour> {
        let mut genes = tour.genes().to_vec();
        if genes.len() < 2 {
            return Tour::new(genes, problem);
        }

        let remove_idx = rng.gen_range(0..genes.len());
        let gene = genes.remove(remove_idx);
        let insert_idx = rng.gen_range(0..genes.len());
        genes.insert(insert_idx, gene);

        Tour::new(genes, problem)
    }

    /// Rotate a random contiguous sub-range left by a random shift.
    pub fn random_slide_mutation<R: Rng>(
        &self,
        tour: &Tour,
        problem: &Problem,
        rng: &mut R,
    ) -> TspResult<Tour> {
        let mut genes = tour.genes().to_vec();
        let n = genes.len();
        if n < 3 {
            return Tour::new(genes, problem);
        }

        let start = rng.gen_range(0..n - 1);
        let end = rng.gen_range(start + 1..n);
        let shift = rng.gen_range(1..end - start + 1);
        genes[start..=end].rotate_left(shift);

        Tour::new(genes, problem)
    }

    /// Pick one mutation with equal odds for a pair of children.
    pub fn choose_mutation<R: Rng>(&self, rng: &mut R) -> Mutation {
        if rng.gen_bool(0.5) {
            Mutation::Insert
        } else {
            Mutation::RandomSlide
        }
    }

    /// Apply the given mutation to a tour.
    pub fn mutate<R: Rng>(
        &self,
        mutation: Mutation,
        tour: &Tour,
        problem: &Problem,
        rng: &mut R,
    ) -> TspResult<Tour> {
        match mutation {
            Mutation::Insert => self.insert_mutation(tour, problem, rng),
            Mutation::RandomSlide => self.random_slide_mutation(tour, problem, rng),
        }
    }
}
