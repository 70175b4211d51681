//! Problem definition: city coordinates and the pairwise distance model.

use crate::error::{TspError, TspResult};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;

/// A city with its identifier and planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl City {
    /// Create a new city.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        City { id, x, y }
    }
}

/// Distance metric declared by `EDGE_WEIGHT_TYPE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeWeightType {
    /// Plain Euclidean distance.
    Euc2D,
    /// TSPLIB pseudo-Euclidean distance.
    Att,
    /// Any other tag; measured as Euclidean.
    Other(String),
}

impl FromStr for EdgeWeightType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EdgeWeightType::from_tag(s))
    }
}

impl fmt::Display for EdgeWeightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeWeightType::Euc2D => write!(f, "EUC_2D"),
            EdgeWeightType::Att => write!(f, "ATT"),
            EdgeWeightType::Other(tag) => write!(f, "{}", tag),
        }
    }
}

impl EdgeWeightType {
    /// Map an `EDGE_WEIGHT_TYPE` tag to a metric; unknown tags are kept as `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "EUC_2D" => EdgeWeightType::Euc2D,
            "ATT" => EdgeWeightType::Att,
            other => EdgeWeightType::Other(other.to_string()),
        }
    }

    /// Measure the distance between two coordinates under this metric.
    pub fn measure(&self, from: &City, to: &City) -> f64 {
        let dx = from.x - to.x;
        let dy = from.y - to.y;

        match self {
            EdgeWeightType::Att => {
                let r = ((dx * dx + dy * dy) / 10.0).sqrt();
                let t = r.round_ties_even();
                if t < r {
                    t + 1.0
                } else {
                    t
                }
            }
            EdgeWeightType::Euc2D | EdgeWeightType::Other(_) => (dx * dx + dy * dy).sqrt(),
        }
    }
}

/// Represents a TSP instance together with its distance model.
///
/// Cities are immutable once the problem is built. Distances are computed up
/// front into a dense matrix indexed by the position of each city in `cities`.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    /// City count declared by the instance
    pub dimension: usize,
    pub edge_weight_type: EdgeWeightType,
    cities: Vec<City>,
    index_of: HashMap<usize, usize>,
    distance_matrix: Vec<Vec<f64>>,
}

impl Problem {
    /// Create a new problem. The declared dimension is the number of cities.
    pub fn new(name: String, edge_weight_type: EdgeWeightType, cities: Vec<City>) -> TspResult<Self> {
        let dimension = cities.len();
        Self::with_dimension(name, dimension, edge_weight_type, cities)
    }

    /// Create a new problem keeping a dimension declared elsewhere (e.g. in a file header).
    pub fn with_dimension(
        name: String,
        dimension: usize,
        edge_weight_type: EdgeWeightType,
        cities: Vec<City>,
    ) -> TspResult<Self> {
        let mut index_of = HashMap::with_capacity(cities.len());
        for (index, city) in cities.iter().enumerate() {
            if index_of.insert(city.id, index).is_some() {
                return Err(TspError::DuplicateCity(city.id));
            }
        }

        if dimension != cities.len() {
            warn!(
                "instance '{}' declares {} cities but has {} coordinates",
                name,
                dimension,
                cities.len()
            );
        }

        let distance_matrix = Self::compute_distance_matrix(&cities, &edge_weight_type);

        Ok(Problem {
            name,
            dimension,
            edge_weight_type,
            cities,
            index_of,
            distance_matrix,
        })
    }

    /// Generate the full distance matrix for all cities.
    fn compute_distance_matrix(cities: &[City], metric: &EdgeWeightType) -> Vec<Vec<f64>> {
        let n = cities.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = metric.measure(&cities[i], &cities[j]);
                }
            }
        }

        matrix
    }

    /// Distance between two city ids.
    pub fn distance(&self, from: usize, to: usize) -> TspResult<f64> {
        let i = self.index(from)?;
        let j = self.index(to)?;
        Ok(self.distance_matrix[i][j])
    }

    /// Total length of the closed loop visiting `genes` in order.
    pub fn tour_length(&self, genes: &[usize]) -> TspResult<f64> {
        genes
            .iter()
            .circular_tuple_windows()
            .try_fold(0.0, |total, (&from, &to)| -> TspResult<f64> {
                Ok(total + self.distance(from, to)?)
            })
    }

    fn index(&self, id: usize) -> TspResult<usize> {
        self.index_of
            .get(&id)
            .copied()
            .ok_or(TspError::UnknownCity(id))
    }

    /// All cities in the order they were loaded.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Identifiers of all cities in the order they were loaded.
    pub fn city_ids(&self) -> Vec<usize> {
        self.cities.iter().map(|city| city.id).collect()
    }

    /// Get the number of cities actually loaded.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Load a problem from a TSPLIB file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Parse a problem from TSPLIB text.
    pub fn from_tsplib_str(content: &str) -> TspResult<Self> {
        Self::from_reader(content.as_bytes())
    }

    /// Parse a problem from any buffered reader holding TSPLIB text.
    ///
    /// Only `NAME`, `DIMENSION`, `EDGE_WEIGHT_TYPE` and `NODE_COORD_SECTION` are
    /// understood; other lines are skipped and `EOF` stops reading.
    pub fn from_reader<R: BufRead>(reader: R) -> TspResult<Self> {
        let mut name = String::new();
        let mut dimension = None;
        let mut edge_weight_type = EdgeWeightType::Euc2D;
        let mut cities = Vec::new();
        let mut reading_coords = false;

        for (index, line_result) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line_result?;
            let line = line.trim();

            if line.starts_with("NAME") {
                name = header_value(line, line_no)?.to_string();
            } else if line.starts_with("DIMENSION") {
                let value = header_value(line, line_no)?;
                dimension = Some(value.parse::<usize>().map_err(|err| TspError::Parse {
                    line: line_no,
                    message: format!("cannot parse DIMENSION '{}': {}", value, err),
                })?);
            } else if line.starts_with("EDGE_WEIGHT_TYPE") {
                let value = header_value(line, line_no)?;
                edge_weight_type = EdgeWeightType::from_tag(value);
            } else if line == "NODE_COORD_SECTION" {
                reading_coords = true;
            } else if line == "EOF" {
                break;
            } else if reading_coords && !line.is_empty() {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 3 {
                    let id = parse_field::<usize>(parts[0], "city id", line_no)?;
                    let x = parse_field::<f64>(parts[1], "x coordinate", line_no)?;
                    let y = parse_field::<f64>(parts[2], "y coordinate", line_no)?;
                    cities.push(City::new(id, x, y));
                }
            }
        }

        let dimension = dimension.unwrap_or(cities.len());
        Self::with_dimension(name, dimension, edge_weight_type, cities)
    }
}

fn header_value(line: &str, line_no: usize) -> TspResult<&str> {
    line.split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| TspError::Parse {
            line: line_no,
            message: format!("expected colon separated key/value, got '{}'", line),
        })
}

fn parse_field<T: FromStr>(data: &str, what: &str, line_no: usize) -> TspResult<T>
where
    T::Err: fmt::Display,
{
    data.parse::<T>().map_err(|err| TspError::Parse {
        line: line_no,
        message: format!("cannot parse {} '{}': {}", what, data, err),
    })
}
