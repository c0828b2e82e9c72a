//! Problem definition and data structures for CVRP.

use crate::error::{AcoError, AcoResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

/// Index of the depot in every matrix and demand vector.
pub const DEPOT: usize = 0;

/// Represents a node (customer or depot) in the CVRP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub demand: u32,
}

impl Node {
    /// Create a new node.
    pub fn new(id: usize, x: f64, y: f64, demand: u32) -> Self {
        Node { id, x, y, demand }
    }

    /// Calculate the Euclidean distance between two nodes.
    pub fn distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Check if this node is the depot.
    pub fn is_depot(&self) -> bool {
        self.id == DEPOT
    }
}

/// Represents a CVRP problem instance.
///
/// The instance is read-only once a search starts. Index 0 is the depot in
/// `demand`, `distance_matrix` and `time_matrix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub name: String,
    /// Coordinates, when the instance was built from points
    #[serde(default)]
    pub nodes: Vec<Node>,
    pub demand: Vec<u32>,
    pub vehicle_capacity: u32,
    pub distance_matrix: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_matrix: Option<Vec<Vec<f64>>>,
}

impl Problem {
    /// Create a new CVRP problem from located nodes. The first node is the depot.
    pub fn new(name: String, nodes: Vec<Node>, vehicle_capacity: u32) -> Self {
        let distance_matrix = Self::compute_distance_matrix(&nodes);
        let demand = nodes.iter().map(|node| node.demand).collect();

        Problem {
            name,
            nodes,
            demand,
            vehicle_capacity,
            distance_matrix,
            time_matrix: None,
        }
    }

    /// Create a problem directly from a demand vector and a distance matrix.
    pub fn from_matrices(
        name: String,
        demand: Vec<u32>,
        distance_matrix: Vec<Vec<f64>>,
        vehicle_capacity: u32,
    ) -> Self {
        Problem {
            name,
            nodes: Vec::new(),
            demand,
            vehicle_capacity,
            distance_matrix,
            time_matrix: None,
        }
    }

    /// Attach a travel time matrix.
    pub fn with_time_matrix(mut self, time_matrix: Vec<Vec<f64>>) -> Self {
        self.time_matrix = Some(time_matrix);
        self
    }

    /// Derive travel times from distances at a constant speed.
    pub fn with_travel_speed(self, speed: f64) -> Self {
        let time_matrix = self
            .distance_matrix
            .iter()
            .map(|row| row.iter().map(|d| d / speed).collect())
            .collect();
        self.with_time_matrix(time_matrix)
    }

    /// Calculate the distance between two location indices.
    pub fn get_distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix[from][to]
    }

    /// Travel time between two location indices, if the instance has times.
    pub fn get_time(&self, from: usize, to: usize) -> Option<f64> {
        self.time_matrix.as_ref().map(|matrix| matrix[from][to])
    }

    /// Check if the instance carries a time matrix.
    pub fn has_time_matrix(&self) -> bool {
        self.time_matrix.is_some()
    }

    /// Number of locations, depot included.
    pub fn size(&self) -> usize {
        self.demand.len()
    }

    /// Get the number of customers (excluding the depot).
    pub fn get_customer_count(&self) -> usize {
        self.demand.len().saturating_sub(1)
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> u64 {
        self.demand.iter().map(|&d| u64::from(d)).sum()
    }

    /// Smallest fleet that could carry the total demand, at least one vehicle.
    pub fn initial_fleet_size(&self) -> usize {
        let capacity = u64::from(self.vehicle_capacity.max(1));
        let vehicles = (self.total_demand() + capacity - 1) / capacity;
        (vehicles as usize).max(1)
    }

    /// Check the instance invariants before a run starts.
    pub fn validate(&self) -> AcoResult<()> {
        let n = self.demand.len();

        if n == 0 {
            return Err(AcoError::InvalidInstance("instance has no locations".into()));
        }
        if n < 2 {
            return Err(AcoError::InvalidInstance("instance has no customers".into()));
        }
        if self.vehicle_capacity == 0 {
            return Err(AcoError::InvalidInstance(
                "vehicle capacity must be positive".into(),
            ));
        }
        if self.demand[DEPOT] != 0 {
            return Err(AcoError::InvalidInstance(format!(
                "depot demand must be 0, got {}",
                self.demand[DEPOT]
            )));
        }
        if let Some((customer, demand)) = self
            .demand
            .iter()
            .enumerate()
            .find(|(_, demand)| **demand > self.vehicle_capacity)
        {
            return Err(AcoError::InvalidInstance(format!(
                "customer {} demand {} exceeds vehicle capacity {}",
                customer, demand, self.vehicle_capacity
            )));
        }

        Self::validate_matrix("distance", &self.distance_matrix, n)?;
        if let Some(time_matrix) = &self.time_matrix {
            Self::validate_matrix("time", time_matrix, n)?;
        }

        Ok(())
    }

    fn validate_matrix(kind: &str, matrix: &[Vec<f64>], n: usize) -> AcoResult<()> {
        if matrix.len() != n {
            return Err(AcoError::InvalidInstance(format!(
                "{} matrix has {} rows, expected {}",
                kind,
                matrix.len(),
                n
            )));
        }

        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(AcoError::InvalidInstance(format!(
                    "{} matrix row {} has {} entries, expected {}",
                    kind,
                    i,
                    row.len(),
                    n
                )));
            }
            if row[i] != 0.0 {
                return Err(AcoError::InvalidInstance(format!(
                    "{} matrix diagonal entry {} is {}, expected 0",
                    kind, i, row[i]
                )));
            }
            if let Some(value) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(AcoError::InvalidInstance(format!(
                    "{} matrix row {} contains invalid entry {}",
                    kind, i, value
                )));
            }
        }

        Ok(())
    }

    /// Generate the full distance matrix for all nodes.
    fn compute_distance_matrix(nodes: &[Node]) -> Vec<Vec<f64>> {
        let n = nodes.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    matrix[i][j] = nodes[i].distance(&nodes[j]);
                }
            }
        }

        matrix
    }

    /// Load a problem from a text file.
    ///
    /// Line 1 holds the name, line 2 the vehicle capacity, and every following
    /// `id x y demand` row is a location; the first row is the depot.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AcoResult<Self> {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);
        let mut lines = reader.lines();

        let name = match lines.next() {
            Some(line) => line?.trim().to_string(),
            None => return Err(AcoError::InvalidInstance("empty instance file".into())),
        };

        let capacity_line = match lines.next() {
            Some(line) => line?,
            None => return Err(AcoError::InvalidInstance("missing capacity line".into())),
        };
        let vehicle_capacity = capacity_line
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .ok_or_else(|| {
                AcoError::InvalidInstance(format!("invalid capacity line '{}'", capacity_line))
            })?;

        let mut nodes = Vec::new();

        for line_result in lines {
            let line = line_result?;
            let parts: Vec<&str> = line.split_whitespace().collect();

            if parts.len() < 4 {
                continue;
            }

            let parse_err = || AcoError::InvalidInstance(format!("invalid node line '{}'", line));
            let x = parts[1].parse::<f64>().map_err(|_| parse_err())?;
            let y = parts[2].parse::<f64>().map_err(|_| parse_err())?;
            let demand = parts[3].parse::<u32>().map_err(|_| parse_err())?;

            nodes.push(Node::new(nodes.len(), x, y, demand));
        }

        Ok(Problem::new(name, nodes, vehicle_capacity))
    }

    /// Load a problem from a JSON document.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> AcoResult<Self> {
        let file = File::open(path)?;
        let problem = serde_json::from_reader(io::BufReader::new(file))?;
        Ok(problem)
    }
}
