//! Pixel projection for pointy-top hexagons
//!
//! Pure functions only. Everything here is parameterised by
//! [`GeometryParams`] so a viewport change is a matter of recomputing with
//! new parameters.
//!
//! Corner winding: corner `k` sits at screen angle `-90° + 60°·k`
//! (y grows downwards), so index 0 is North and the rest follow clockwise:
//! 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW. Side `k` joins corners `k` and `k+1`.
//! Server vertex/edge slot arrays use the same numbering.

use serde::{Deserialize, Serialize};

use crate::coords::HexCoordinate;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A 2-D point in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Approximate equality for coordinates computed along different paths
    pub fn approx_eq(self, other: Point) -> bool {
        self.distance_to(other) < 1e-6
    }
}

/// Six hexagon corners, indexed by the corner winding above
pub type Hexagon = [Point; 6];

/// Edge rectangle drawn in the gap between two tiles
pub type Quad = [Point; 4];

/// Sizing knobs for a board projection
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Hexagon circumradius
    pub hex_size: f64,
    /// Gap between the sides of adjacent tiles
    pub spacing: f64,
    /// Margin around the board's bounding box
    pub outer_padding: f64,
    /// Inset of edge rectangles from either tile side
    pub edge_padding: f64,
}

impl GeometryParams {
    pub fn new(hex_size: f64, spacing: f64) -> Self {
        Self {
            hex_size,
            spacing,
            outer_padding: 0.0,
            edge_padding: 0.0,
        }
    }

    pub fn with_outer_padding(mut self, padding: f64) -> Self {
        self.outer_padding = padding;
        self
    }

    pub fn with_edge_padding(mut self, padding: f64) -> Self {
        self.edge_padding = padding;
        self
    }

    /// Factor by which centres move apart so that sides are `spacing` apart
    pub fn spacing_factor(&self) -> f64 {
        1.0 + self.spacing / (SQRT_3 * self.hex_size)
    }

    /// Uniformly rescale so the whole grid fits inside `viewport`.
    ///
    /// Returns `self` unchanged when the viewport is empty.
    pub fn fit(&self, viewport: Viewport, grid: &[HexCoordinate]) -> GeometryParams {
        let rect = bounding_box(grid, self);
        let scale = (viewport.width / rect.width()).min(viewport.height / rect.height());
        if !scale.is_finite() || scale <= 0.0 {
            return *self;
        }
        GeometryParams {
            hex_size: self.hex_size * scale,
            spacing: self.spacing * scale,
            outer_padding: self.outer_padding * scale,
            edge_padding: self.edge_padding * scale,
        }
    }
}

/// Drawing surface dimensions reported by the renderer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Project a cube coordinate to the tile centre (board origin at (0, 0))
pub fn cube_to_pixel(coord: HexCoordinate, hex_size: f64, spacing: f64) -> Point {
    let factor = 1.0 + spacing / (SQRT_3 * hex_size);
    let q = f64::from(coord.q);
    let r = f64::from(coord.r);
    Point::new(
        factor * hex_size * (SQRT_3 * q + SQRT_3 / 2.0 * r),
        factor * hex_size * (1.5 * r),
    )
}

/// Unit vector pointing at corner `k`
fn corner_direction(k: usize) -> Point {
    let angle = (-90.0_f64 + 60.0 * k as f64).to_radians();
    Point::new(angle.cos(), angle.sin())
}

/// Hexagon corners around `center`
pub fn hexagon_corners(center: Point, size: f64) -> Hexagon {
    std::array::from_fn(|k| {
        let u = corner_direction(k);
        Point::new(center.x + size * u.x, center.y + size * u.y)
    })
}

/// Drawable vertex positions: the junction of the gaps around each corner.
///
/// Every tile sharing a vertex computes the same point.
pub fn vertex_anchors(center: Point, params: &GeometryParams) -> Hexagon {
    hexagon_corners(center, params.hex_size + params.spacing / SQRT_3)
}

/// Edge rectangles, one per side, spanning the gap outside each side
pub fn edge_quads(center: Point, params: &GeometryParams) -> [Quad; 6] {
    let corners = hexagon_corners(center, params.hex_size);
    let inner = params.edge_padding;
    let outer = params.spacing - params.edge_padding;

    std::array::from_fn(|k| {
        let a = corners[k];
        let b = corners[(k + 1) % 6];
        let length = a.distance_to(b);
        let along = Point::new((b.x - a.x) / length, (b.y - a.y) / length);
        let normal_angle = (-60.0_f64 + 60.0 * k as f64).to_radians();
        let normal = Point::new(normal_angle.cos(), normal_angle.sin());
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let half = length / 2.0;

        let at = |side: f64, depth: f64| {
            Point::new(
                mid.x + along.x * half * side + normal.x * depth,
                mid.y + along.y * half * side + normal.y * depth,
            )
        };
        [at(-1.0, inner), at(1.0, inner), at(1.0, outer), at(-1.0, outer)]
    })
}

/// Bounding rectangle of all tiles, extended by `outer_padding`
pub fn bounding_box(grid: &[HexCoordinate], params: &GeometryParams) -> Rect {
    let size = params.hex_size;
    let (min, max) = grid.iter().fold(
        (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), &coord| {
            let p = cube_to_pixel(coord, size, params.spacing);
            (
                Point::new(min.x.min(p.x - size), min.y.min(p.y - size)),
                Point::new(max.x.max(p.x + size), max.y.max(p.y + size)),
            )
        },
    );
    Rect {
        min: Point::new(min.x - params.outer_padding, min.y - params.outer_padding),
        max: Point::new(max.x + params.outer_padding, max.y + params.outer_padding),
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Surface size plus the translation that moves the board into it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub params: GeometryParams,
    pub bounds: Rect,
    pub translation: Point,
}

impl Layout {
    pub fn new(grid: &[HexCoordinate], params: GeometryParams) -> Self {
        let bounds = bounding_box(grid, &params);
        Self {
            params,
            bounds,
            translation: Point::new(-bounds.min.x, -bounds.min.y),
        }
    }

    pub fn surface_width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn surface_height(&self) -> f64 {
        self.bounds.height()
    }

    /// Tile centre in surface coordinates
    pub fn project(&self, coord: HexCoordinate) -> Point {
        cube_to_pixel(coord, self.params.hex_size, self.params.spacing).translate(self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::base_grid;

    #[test]
    fn test_center_projects_to_origin() {
        let p = cube_to_pixel(HexCoordinate::new(0, 0), 64.0, 8.0);
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_projection_is_injective() {
        let grid = base_grid();
        for &(size, spacing) in &[(64.0, 8.0), (1.0, 0.0), (10.0, 100.0), (0.5, 3.0)] {
            let points: Vec<Point> = grid
                .iter()
                .map(|&c| cube_to_pixel(c, size, spacing))
                .collect();
            for i in 0..points.len() {
                for j in i + 1..points.len() {
                    assert!(
                        !points[i].approx_eq(points[j]),
                        "tiles {} and {} collide at size={} spacing={}",
                        i,
                        j,
                        size,
                        spacing
                    );
                }
            }
        }
    }

    #[test]
    fn test_spacing_keeps_gap_between_sides() {
        let size = 64.0;
        let spacing = 8.0;
        let a = cube_to_pixel(HexCoordinate::new(0, 0), size, spacing);
        let b = cube_to_pixel(HexCoordinate::new(1, 0), size, spacing);
        let apothem = SQRT_3 / 2.0 * size;
        assert!((a.distance_to(b) - (2.0 * apothem + spacing)).abs() < 1e-9);
    }

    #[test]
    fn test_corner_winding() {
        let corners = hexagon_corners(Point::new(0.0, 0.0), 10.0);
        assert!(corners[0].approx_eq(Point::new(0.0, -10.0)));
        assert!(corners[3].approx_eq(Point::new(0.0, 10.0)));
        // clockwise on screen: NE is right of N and still above centre
        assert!(corners[1].x > 0.0 && corners[1].y < 0.0);
        assert!(corners[2].x > 0.0 && corners[2].y > 0.0);
        assert!(corners[4].x < 0.0 && corners[4].y > 0.0);
        assert!(corners[5].x < 0.0 && corners[5].y < 0.0);
    }

    #[test]
    fn test_center_lands_on_surface_midpoint() {
        let grid = base_grid();
        let params = GeometryParams::new(64.0, 8.0).with_outer_padding(20.0);
        let layout = Layout::new(&grid, params);
        let center = layout.project(HexCoordinate::new(0, 0));
        assert!((center.x - layout.surface_width() / 2.0).abs() < 1e-9);
        assert!((center.y - layout.surface_height() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_contains_every_corner() {
        let grid = base_grid();
        let params = GeometryParams::new(64.0, 8.0).with_outer_padding(20.0);
        let rect = bounding_box(&grid, &params);
        for &coord in &grid {
            for corner in hexagon_corners(cube_to_pixel(coord, 64.0, 8.0), 64.0) {
                assert!(corner.x >= rect.min.x && corner.x <= rect.max.x);
                assert!(corner.y >= rect.min.y && corner.y <= rect.max.y);
            }
        }
    }

    #[test]
    fn test_edge_quad_shared_between_neighbours() {
        let params = GeometryParams::new(64.0, 8.0);
        let a = cube_to_pixel(HexCoordinate::new(0, 0), 64.0, 8.0);
        // East neighbour shares side 1 of `a` with its side 4
        let b = cube_to_pixel(HexCoordinate::new(1, 0), 64.0, 8.0);
        let qa = edge_quads(a, &params)[1];
        let qb = edge_quads(b, &params)[4];
        for p in qa {
            assert!(qb.iter().any(|q| q.approx_eq(p)), "{:?} missing from {:?}", p, qb);
        }
    }

    #[test]
    fn test_vertex_anchor_shared_between_three_tiles() {
        let params = GeometryParams::new(64.0, 8.0);
        let project = |q, r| cube_to_pixel(HexCoordinate::new(q, r), 64.0, 8.0);
        // NE corner of the centre tile touches the NE and E neighbours
        let from_center = vertex_anchors(project(0, 0), &params)[1];
        let from_ne = vertex_anchors(project(1, -1), &params)[3];
        let from_e = vertex_anchors(project(1, 0), &params)[5];
        assert!(from_center.approx_eq(from_ne));
        assert!(from_center.approx_eq(from_e));
    }

    #[test]
    fn test_fit_scales_into_viewport() {
        let grid = base_grid();
        let params = GeometryParams::new(64.0, 8.0).with_outer_padding(20.0);
        let fitted = params.fit(Viewport { width: 400.0, height: 300.0 }, &grid);
        let rect = bounding_box(&grid, &fitted);
        assert!(rect.width() <= 400.0 + 1e-9);
        assert!(rect.height() <= 300.0 + 1e-9);
        assert!((fitted.spacing / fitted.hex_size - 8.0 / 64.0).abs() < 1e-12);

        let unchanged = params.fit(Viewport { width: 0.0, height: 0.0 }, &grid);
        assert_eq!(unchanged, params);
    }
}
