//! Hex board coordinates with cube addressing

use serde::{Deserialize, Serialize};

/// Cube hex coordinates. `q + r + s == 0` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoordinate {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl HexCoordinate {
    /// Build from the two axial components; `s` is derived.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Check the cube invariant (wire payloads carry all three components)
    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: HexCoordinate) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s - other.s).abs()) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> HexCoordinate {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        HexCoordinate::new(self.q + dq, self.r + dr)
    }
}

/// Direction vectors in axial coordinates (dq, dr), pointy-top.
/// Index: 0=NE, 1=E, 2=SE, 3=SW, 4=W, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, -1), // NE
    (1, 0),  // E
    (0, 1),  // SE
    (-1, 1), // SW
    (-1, 0), // W
    (0, -1), // NW
];

/// Row layout of the 19-cell board: (q, r-values), sizes 3,4,5,4,3.
const BASE_ROWS: [(i32, &[i32]); 5] = [
    (-2, &[0, 1, 2]),
    (-1, &[-1, 0, 1, 2]),
    (0, &[-2, -1, 0, 1, 2]),
    (1, &[-2, -1, 0, 1]),
    (2, &[-2, -1, 0]),
];

/// Number of cells on the base board
pub const BASE_GRID_LEN: usize = 19;

/// Generate the fixed 19-cell grid.
///
/// The order is part of the wire contract: tile `i` of the server's map
/// payload sits in grid slot `i`.
pub fn base_grid() -> Vec<HexCoordinate> {
    let mut grid = Vec::with_capacity(BASE_GRID_LEN);
    for (q, r_values) in BASE_ROWS {
        for &r in r_values {
            grid.push(HexCoordinate::new(q, r));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_grid_invariant() {
        let grid = base_grid();
        assert_eq!(grid.len(), BASE_GRID_LEN);
        for hex in &grid {
            assert_eq!(hex.q + hex.r + hex.s, 0, "{:?} breaks q+r+s=0", hex);
        }
    }

    #[test]
    fn test_base_grid_is_stable() {
        assert_eq!(base_grid(), base_grid());
        let grid = base_grid();
        assert_eq!(grid[0], HexCoordinate::new(-2, 0));
        assert_eq!(grid[9], HexCoordinate::new(0, 0));
        assert_eq!(grid[18], HexCoordinate::new(2, 0));
    }

    #[test]
    fn test_base_grid_rows() {
        let grid = base_grid();
        let sizes: Vec<usize> = (-2..=2)
            .map(|q| grid.iter().filter(|h| h.q == q).count())
            .collect();
        assert_eq!(sizes, vec![3, 4, 5, 4, 3]);
    }

    #[test]
    fn test_base_grid_unique_and_within_radius() {
        let grid = base_grid();
        let center = HexCoordinate::new(0, 0);
        for (i, a) in grid.iter().enumerate() {
            assert!(a.distance_to(center) <= 2);
            for b in &grid[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = HexCoordinate::new(0, 0);
        for dir in 0..6 {
            let n = center.neighbor(dir);
            assert!(n.is_valid());
            assert_eq!(center.distance_to(n), 1);
        }
    }
}
