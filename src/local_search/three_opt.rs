//! 3-Opt neighborhood.

use crate::error::TspResult;
use crate::problem::Problem;
use crate::tour::Tour;
use log::trace;

use super::LocalSearch;

/// Build the reconnections of the segments `[i, j)` and `[j, k)`.
///
/// Candidates, in evaluation order: identity, the two segments swapped, swapped
/// with `[j, k)` reversed, swapped with `[i, j)` reversed, swapped with both reversed.
/// The last one equals reversing all of `[i, k)`, a move 2-opt already covers.
fn reconnections(genes: &[usize], i: usize, j: usize, k: usize) -> [Vec<usize>; 5] {
    let head = &genes[..i];
    let first = &genes[i..j];
    let second = &genes[j..k];
    let tail = &genes[k..];

    [
        genes.to_vec(),
        join(head, second.iter().copied(), first.iter().copied(), tail),
        join(head, second.iter().rev().copied(), first.iter().copied(), tail),
        join(head, second.iter().copied(), first.iter().rev().copied(), tail),
        join(head, second.iter().rev().copied(), first.iter().rev().copied(), tail),
    ]
}

fn join(
    head: &[usize],
    a: impl Iterator<Item = usize>,
    b: impl Iterator<Item = usize>,
    tail: &[usize],
) -> Vec<usize> {
    let mut out = head.to_vec();
    out.extend(a);
    out.extend(b);
    out.extend_from_slice(tail);
    out
}

impl LocalSearch {
    /// Improve a tour with 3-opt reconnections until no reconnection helps.
    ///
    /// Cut points satisfy `i < j < k` with `j >= i + 2` and `k >= j + 2`. The
    /// upper bound of `k` is `n - 1` when `i == 0` and `n` otherwise.
    pub fn three_opt(&mut self, tour: &Tour, problem: &Problem) -> TspResult<Tour> {
        let mut best = tour.clone();
        let n = best.len();

        'restart: loop {
            for i in 0..n.saturating_sub(2) {
                for j in i + 2..n.saturating_sub(1) {
                    let k_end = if i > 0 { n + 1 } else { n };
                    for k in j + 2..k_end {
                        for genes in reconnections(best.genes(), i, j, k) {
                            if let Some(candidate) =
                                self.try_candidate(genes, best.total_distance(), problem)?
                            {
                                trace!(
                                    "3-opt cut ({}, {}, {}): {:.2} -> {:.2}",
                                    i,
                                    j,
                                    k,
                                    best.total_distance(),
                                    candidate.total_distance()
                                );
                                best = candidate;
                                continue 'restart;
                            }
                        }
                    }
                }
            }

            return Ok(best);
        }
    }
}
