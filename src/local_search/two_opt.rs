//! 2-Opt neighborhood.

use crate::error::TspResult;
use crate::problem::Problem;
use crate::tour::Tour;
use log::trace;

use super::LocalSearch;

impl LocalSearch {
    /// Improve a tour with 2-opt segment reversals until no reversal helps.
    ///
    /// For every pair `(i, k)` with `k >= i + 2` the segment `[i, k)` is
    /// reversed. The returned tour is never longer than the input.
    pub fn two_opt(&mut self, tour: &Tour, problem: &Problem) -> TspResult<Tour> {
        let mut best = tour.clone();
        let n = best.len();

        'restart: loop {
            for i in 0..n.saturating_sub(1) {
                for k in i + 2..n {
                    let mut genes = best.genes().to_vec();
                    genes[i..k].reverse();

                    if let Some(candidate) = self.try_candidate(genes, best.total_distance(), problem)? {
                        trace!(
                            "2-opt reversed [{}, {}): {:.2} -> {:.2}",
                            i,
                            k,
                            best.total_distance(),
                            candidate.total_distance()
                        );
                        best = candidate;
                        continue 'restart;
                    }
                }
            }

            return Ok(best);
        }
    }
}
