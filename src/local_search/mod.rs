//! Local search refinement applied to a single tour.
//!
//! Both neighborhoods use first improvement: the first candidate shorter than
//! the current tour is accepted and the scan restarts from the beginning. The
//! cost grows combinatorially with the instance size, so these are meant for
//! small instances only.

pub mod three_opt;
pub mod two_opt;

use crate::error::TspResult;
use crate::problem::Problem;
use crate::tour::Tour;

/// Runs 2-opt and 3-opt over a tour and keeps simple counters.
#[derive(Debug, Default)]
pub struct LocalSearch {
    /// Candidate tours evaluated since creation
    pub candidates_evaluated: usize,
    /// Improving moves accepted since creation
    pub moves_accepted: usize,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new() -> Self {
        LocalSearch::default()
    }

    /// Apply 2-opt and then 3-opt to the result.
    pub fn refine(&mut self, tour: &Tour, problem: &Problem) -> TspResult<Tour> {
        let tour = self.two_opt(tour, problem)?;
        self.three_opt(&tour, problem)
    }

    /// Evaluate a candidate against the current best distance.
    ///
    /// Returns the candidate tour when it is strictly shorter.
    pub(crate) fn try_candidate(
        &mut self,
        genes: Vec<usize>,
        best_distance: f64,
        problem: &Problem,
    ) -> TspResult<Option<Tour>> {
        self.candidates_evaluated += 1;
        let candidate = Tour::new(genes, problem)?;

        if candidate.total_distance() < best_distance {
            self.moves_accepted += 1;
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }
}
