//! Proximity connection graph.
//!
//! Rebuilt from scratch every tick: an edge exists for every unordered
//! particle pair closer than the connection distance, symmetric by
//! construction. Small populations use the direct O(n²) pair scan; larger
//! ones go through a uniform cell grid that produces the identical edge
//! set.

use std::collections::HashMap;

use crate::particle::Particle;

/// Population size at which rebuilds switch to the cell grid.
const GRID_THRESHOLD: usize = 192;

/// An undirected proximity edge between two particle indices (`a < b`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

#[derive(Default)]
pub struct ConnectionGraph {
    edges: Vec<Edge>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether an edge exists between the two indices, in either order.
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.edges.iter().any(|e| e.a == lo && e.b == hi)
    }

    /// Rendering opacity for an edge: linear falloff from `base_opacity`
    /// at distance zero to nothing at the threshold.
    pub fn edge_opacity(edge: &Edge, connection_distance: f32, base_opacity: f32) -> f32 {
        if connection_distance <= 0.0 {
            return 0.0;
        }
        (1.0 - edge.distance / connection_distance).max(0.0) * base_opacity
    }

    /// Rebuild the edge set and each particle's transient neighbor list.
    ///
    /// A non-positive `connection_distance` clears the graph.
    pub fn rebuild(&mut self, particles: &mut [Particle], connection_distance: f32) {
        self.edges.clear();
        for p in particles.iter_mut() {
            p.connections.clear();
        }
        if connection_distance <= 0.0 || particles.len() < 2 {
            return;
        }

        if particles.len() <= GRID_THRESHOLD {
            self.rebuild_brute(particles, connection_distance);
        } else {
            self.rebuild_grid(particles, connection_distance);
        }

        for edge in &self.edges {
            let id_b = particles[edge.b].id;
            particles[edge.a].connections.push(id_b);
            let id_a = particles[edge.a].id;
            particles[edge.b].connections.push(id_a);
        }
    }

    fn rebuild_brute(&mut self, particles: &[Particle], connection_distance: f32) {
        for a in 0..particles.len() {
            for b in (a + 1)..particles.len() {
                let distance = particles[a].position.distance(particles[b].position);
                if distance < connection_distance {
                    self.edges.push(Edge { a, b, distance });
                }
            }
        }
    }

    fn rebuild_grid(&mut self, particles: &[Particle], connection_distance: f32) {
        let cell = connection_distance;
        let key = |x: f32, y: f32| ((x / cell).floor() as i64, (y / cell).floor() as i64);

        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in particles.iter().enumerate() {
            grid.entry(key(p.position.x, p.position.y)).or_default().push(i);
        }

        for (a, p) in particles.iter().enumerate() {
            let (cx, cy) = key(p.position.x, p.position.y);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &b in bucket {
                        if b <= a {
                            continue;
                        }
                        let distance = p.position.distance(particles[b].position);
                        if distance < connection_distance {
                            self.edges.push(Edge { a, b, distance });
                        }
                    }
                }
            }
        }
        // Bucket iteration order is grid-dependent; normalize so both
        // rebuild paths yield the same sequence.
        self.edges
            .sort_unstable_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::environment::Environment;
    use crate::spawn::SpawnContext;

    fn population(n: usize, seed: u64) -> Vec<Particle> {
        let config = SimulationConfig::default();
        let env = Environment::default();
        let mut ctx = SpawnContext::new(seed);
        (0..n).map(|_| ctx.spawn(&config, &env, 500.0, 400.0)).collect()
    }

    #[test]
    fn edges_are_symmetric_and_below_threshold() {
        let mut particles = population(80, 11);
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&mut particles, 90.0);
        for edge in graph.edges() {
            assert!(edge.distance < 90.0);
            assert!(graph.are_connected(edge.a, edge.b));
            assert!(graph.are_connected(edge.b, edge.a));
        }
    }

    #[test]
    fn neighbor_lists_mirror_edges() {
        let mut particles = population(40, 12);
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&mut particles, 120.0);
        for edge in graph.edges() {
            let id_a = particles[edge.a].id;
            let id_b = particles[edge.b].id;
            assert!(particles[edge.a].connections.contains(&id_b));
            assert!(particles[edge.b].connections.contains(&id_a));
        }
    }

    #[test]
    fn grid_matches_brute_force() {
        // Above the threshold the grid path runs; compare it against a
        // brute-force rebuild of the same population.
        let mut particles = population(300, 13);
        let mut grid = ConnectionGraph::new();
        grid.rebuild(&mut particles, 60.0);

        let mut brute = ConnectionGraph::new();
        brute.rebuild_brute(&particles, 60.0);

        assert_eq!(grid.edges().len(), brute.edges.len());
        for (g, b) in grid.edges().iter().zip(&brute.edges) {
            assert_eq!((g.a, g.b), (b.a, b.b));
            assert!((g.distance - b.distance).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_distance_clears_graph() {
        let mut particles = population(30, 14);
        let mut graph = ConnectionGraph::new();
        graph.rebuild(&mut particles, 120.0);
        graph.rebuild(&mut particles, 0.0);
        assert!(graph.edges().is_empty());
        assert!(particles.iter().all(|p| p.connections.is_empty()));
    }

    #[test]
    fn opacity_falls_off_linearly() {
        let edge = Edge {
            a: 0,
            b: 1,
            distance: 50.0,
        };
        let opacity = ConnectionGraph::edge_opacity(&edge, 100.0, 0.4);
        assert!((opacity - 0.2).abs() < 1e-6);
        let rim = Edge {
            a: 0,
            b: 1,
            distance: 100.0,
        };
        assert_eq!(ConnectionGraph::edge_opacity(&rim, 100.0, 0.4), 0.0);
    }
}
