//! Non-dominated filtering over `(distance, time)` objective pairs.

use serde::{Deserialize, Serialize};

/// Check whether objective pair `a` dominates `b` (both minimized).
///
/// `a` dominates `b` when it is no worse in both objectives and strictly
/// better in at least one.
pub fn dominates(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 <= b.0 && a.1 < b.1) || (a.0 < b.0 && a.1 <= b.1)
}

/// One member of a Pareto front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint<T> {
    pub objectives: (f64, f64),
    pub item: T,
}

/// An antichain of objective pairs under [`dominates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoFront<T> {
    points: Vec<ParetoPoint<T>>,
}

impl<T> ParetoFront<T> {
    /// Create an empty front.
    pub fn new() -> Self {
        ParetoFront { points: Vec::new() }
    }

    /// Offer a new pair to the front.
    ///
    /// The pair is discarded if a member dominates it or has exactly the same
    /// objectives. Otherwise every member it dominates is removed and the pair
    /// is inserted. Returns whether the pair was inserted.
    pub fn insert(&mut self, objectives: (f64, f64), item: T) -> bool {
        if self
            .points
            .iter()
            .any(|point| point.objectives == objectives || dominates(point.objectives, objectives))
        {
            return false;
        }

        self.points
            .retain(|point| !dominates(objectives, point.objectives));
        self.points.push(ParetoPoint { objectives, item });
        true
    }

    /// The members of the front in insertion order.
    pub fn points(&self) -> &[ParetoPoint<T>] {
        &self.points
    }

    /// The objective pairs of the front, sorted by the first objective.
    pub fn objectives(&self) -> Vec<(f64, f64)> {
        let mut objectives: Vec<(f64, f64)> =
            self.points.iter().map(|point| point.objectives).collect();
        objectives.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        objectives
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the front is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The member with the smallest first objective.
    pub fn best_by_first(&self) -> Option<&ParetoPoint<T>> {
        self.points
            .iter()
            .min_by(|a, b| a.objectives.0.total_cmp(&b.objectives.0))
    }

    /// Consume the front, returning its members.
    pub fn into_points(self) -> Vec<ParetoPoint<T>> {
        self.points
    }
}

impl<T> Default for ParetoFront<T> {
    fn default() -> Self {
        ParetoFront::new()
    }
}

impl<T> FromIterator<((f64, f64), T)> for ParetoFront<T> {
    fn from_iter<I: IntoIterator<Item = ((f64, f64), T)>>(iter: I) -> Self {
        let mut front = ParetoFront::new();
        for (objectives, item) in iter {
            front.insert(objectives, item);
        }
        front
    }
}
