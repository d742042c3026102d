use serde::{Deserialize, Serialize};

/// Feature geometry as fetched from the source layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(f64, f64),
    /// Ordered vertices of the first path.
    Line(Vec<(f64, f64)>),
    /// Ordered rings; only the first ring is ever consulted.
    Polygon(Vec<Vec<(f64, f64)>>),
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

impl Geometry {
    /// Collapse to the single representative coordinate pair used to place
    /// the QC marker.
    ///
    /// - Point: the point itself, rounded to 6 dp.
    /// - Line: midpoint of the first two vertices only, rounded to 6 dp.
    ///   Not the true midpoint of a multi-vertex line; inherited behavior,
    ///   kept for continuity with historical marker placement.
    /// - Polygon: unweighted vertex mean of the first ring, unrounded.
    ///   Holes and additional rings are ignored.
    ///
    /// Assumes well-formed geometry for the declared kind; a malformed
    /// record is a caller-level fault, not handled here.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Geometry::Point(x, y) => (round6(*x), round6(*y)),
            Geometry::Line(vertices) => {
                let (x1, y1) = vertices[0];
                let (x2, y2) = vertices[1];
                (round6((x1 + x2) / 2.0), round6((y1 + y2) / 2.0))
            }
            Geometry::Polygon(rings) => {
                let ring = &rings[0];
                let n = ring.len() as f64;
                let sum_x: f64 = ring.iter().map(|p| p.0).sum();
                let sum_y: f64 = ring.iter().map(|p| p.1).sum();
                (sum_x / n, sum_y / n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_rounds_to_six_decimals() {
        let g = Geometry::Point(3.123456789, 7.00001);
        assert_eq!(g.anchor(), (3.123457, 7.00001));
    }

    #[test]
    fn line_uses_first_two_vertices_only() {
        let g = Geometry::Line(vec![(0.0, 0.0), (2.0, 4.0)]);
        assert_eq!(g.anchor(), (1.0, 2.0));

        // Extra vertices do not move the anchor.
        let g = Geometry::Line(vec![(0.0, 0.0), (2.0, 4.0), (100.0, 100.0)]);
        assert_eq!(g.anchor(), (1.0, 2.0));
    }

    #[test]
    fn polygon_averages_first_ring_unrounded() {
        let g = Geometry::Polygon(vec![
            vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)],
            vec![(50.0, 50.0)], // hole, ignored
        ]);
        assert_eq!(g.anchor(), (1.5, 1.5));
    }
}
