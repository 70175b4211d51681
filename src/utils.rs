//! Utility functions and structures for reporting and checking runs.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::problem::Problem;
use crate::tour::Tour;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a tour to a file in TSPLIB TOUR format.
pub fn save_tour<P: AsRef<Path>>(tour: &Tour, problem: &Problem, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "NAME : {}.tour", problem.name)?;
    writeln!(file, "COMMENT : Length {:.2}", tour.total_distance())?;
    writeln!(file, "TYPE : TOUR")?;
    writeln!(file, "DIMENSION : {}", tour.len())?;
    writeln!(file, "TOUR_SECTION")?;
    for city in tour.genes() {
        writeln!(file, "{}", city)?;
    }
    writeln!(file, "-1")?;
    writeln!(file, "EOF")?;

    Ok(())
}

/// Check that `genes` holds every id of `city_ids` exactly once.
pub fn is_permutation_of(genes: &[usize], city_ids: &[usize]) -> bool {
    if genes.len() != city_ids.len() {
        return false;
    }

    let expected: HashSet<usize> = city_ids.iter().copied().collect();
    let mut seen = HashSet::with_capacity(genes.len());

    genes
        .iter()
        .all(|city| expected.contains(city) && seen.insert(*city))
}

/// Relative improvement of `best` over `initial`, in percent.
pub fn improvement_percentage(initial: f64, best: f64) -> f64 {
    if initial.is_finite() && initial > 0.0 {
        (initial - best) / initial * 100.0
    } else {
        0.0
    }
}

/// Statistics about a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub instance: String,
    pub cities: usize,
    pub generations: usize,
    pub initial_distance: f64,
    pub best_distance: f64,
    pub improvement: f64,
    pub local_search: bool,
    pub runtime: Duration,
}

impl RunStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Run Statistics:
- Instance: {}
- Cities: {}
- Generations: {}
- Runtime: {}
- Initial Distance: {:.2}
- Best Distance: {:.2}
- Improvement: {:.2}%
- Local Search: {}",
            self.instance,
            self.cities,
            self.generations,
            format_duration(self.runtime),
            self.initial_distance,
            self.best_distance,
            self.improvement,
            if self.local_search { "yes" } else { "no" }
        )
    }

    /// One row of the summary table printed after several runs.
    pub fn table_row(&self) -> String {
        format!(
            "{:<20} {:<8} {:<8} {:<12.2} {:<9.2}% {:<8}",
            self.instance,
            self.cities,
            self.generations,
            self.best_distance,
            self.improvement,
            if self.local_search { "yes" } else { "no" }
        )
    }

    /// Header matching `table_row`.
    pub fn table_header() -> String {
        format!(
            "{:<20} {:<8} {:<8} {:<12} {:<10} {:<8}",
            "Instance", "Cities", "Gens", "Best", "Improve", "2/3-opt"
        )
    }
}
