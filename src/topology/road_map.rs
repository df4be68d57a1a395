use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::topology::{Location, LocationGraph};

/// An undirected road network with shortest-path distances.
///
/// Neighbors are the endpoints of direct routes. The distance between any two
/// locations is the length of the shortest route path between them, computed
/// once at construction with Floyd-Warshall. Unreachable pairs have infinite
/// distance.
///
/// Every task state carries a pickup to its destination, so planning over a
/// disconnected map fails in `StateSpace::build` with `InvalidDistance`.
/// Check [`RoadMap::is_connected`] first to catch that early.
#[derive(Debug, Clone)]
pub struct RoadMap<L: Location> {
    locations: Vec<L>,
    index: HashMap<L, usize>,
    neighbors: Vec<Vec<L>>,
    distances: Vec<Vec<f64>>,
}

impl<L: Location> RoadMap<L> {
    /// Builds a road map from `(a, b, length)` routes.
    ///
    /// # Errors
    /// * `SelfLoop` if a route connects a location to itself
    /// * `InvalidDistance` if a route length is not finite and positive
    ///
    /// # Examples
    /// ```
    /// use reactive_mdp::topology::{LocationGraph, RoadMap};
    ///
    /// let map = RoadMap::new(vec![("A", "B", 2.0), ("B", "C", 3.0)]).unwrap();
    /// assert_eq!(map.distance("A", "C"), 5.0);
    /// assert_eq!(map.neighbors("B"), vec!["A", "C"]);
    /// ```
    pub fn new<I>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, L, f64)>,
    {
        Self::with_locations(std::iter::empty(), routes)
    }

    /// Like [`RoadMap::new`], but also registers `locations` that may have no
    /// routes at all.
    pub fn with_locations<P, I>(locations: P, routes: I) -> Result<Self>
    where
        P: IntoIterator<Item = L>,
        I: IntoIterator<Item = (L, L, f64)>,
    {
        let routes: Vec<(L, L, f64)> = routes.into_iter().collect();

        let mut all: BTreeSet<L> = locations.into_iter().collect();
        for &(a, b, length) in &routes {
            if a == b {
                return Err(Error::SelfLoop {
                    location: format!("{:?}", a),
                });
            }
            if !(length.is_finite() && length > 0.0) {
                return Err(Error::InvalidDistance {
                    from: format!("{:?}", a),
                    to: format!("{:?}", b),
                    value: length,
                });
            }
            all.insert(a);
            all.insert(b);
        }

        let locations: Vec<L> = all.into_iter().collect();
        let index: HashMap<L, usize> = locations
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, i))
            .collect();
        let n = locations.len();

        let mut adjacency = vec![BTreeSet::new(); n];
        let mut distances = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in distances.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for &(a, b, length) in &routes {
            let (i, j) = (index[&a], index[&b]);
            adjacency[i].insert(b);
            adjacency[j].insert(a);
            // Parallel routes keep the shorter one
            if length < distances[i][j] {
                distances[i][j] = length;
                distances[j][i] = length;
            }
        }

        for k in 0..n {
            for i in 0..n {
                if distances[i][k].is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let through_k = distances[i][k] + distances[k][j];
                    if through_k < distances[i][j] {
                        distances[i][j] = through_k;
                    }
                }
            }
        }

        Ok(Self {
            locations,
            index,
            neighbors: adjacency
                .into_iter()
                .map(|set| set.into_iter().collect())
                .collect(),
            distances,
        })
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, location: L) -> bool {
        self.index.contains_key(&location)
    }

    /// True if every location can reach every other one.
    pub fn is_connected(&self) -> bool {
        self.distances
            .iter()
            .all(|row| row.iter().all(|d| d.is_finite()))
    }
}

impl<L: Location> LocationGraph for RoadMap<L> {
    type Location = L;

    fn locations(&self) -> Vec<L> {
        self.locations.clone()
    }

    fn neighbors(&self, location: L) -> Vec<L> {
        self.index
            .get(&location)
            .map(|&i| self.neighbors[i].clone())
            .unwrap_or_default()
    }

    fn distance(&self, from: L, to: L) -> f64 {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&i), Some(&j)) => self.distances[i][j],
            _ => f64::INFINITY,
        }
    }
}
