use crate::geom::{Geometry, LineString, Polygon};
use crate::rdp::simplify_line;

fn simplify_linestring(line: &LineString, tolerance: f64) -> LineString {
  LineString {
    points: simplify_line(&line.points, tolerance),
  }
}

// every ring, shell and holes alike, is simplified on its own
fn simplify_polygon(polygon: &Polygon, tolerance: f64) -> Polygon {
  Polygon {
    rings: polygon
      .rings
      .iter()
      .map(|ring| simplify_linestring(ring, tolerance))
      .collect(),
  }
}

/// Simplifies every line and ring in `geometry`. The result is always of the
/// same kind; points are copied as they are.
pub fn simplify_geometry(geometry: &Geometry, tolerance: f64) -> Geometry {
  match geometry {
    Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
    Geometry::LineString(line) => Geometry::LineString(simplify_linestring(line, tolerance)),
    Geometry::MultiLineString(lines) => Geometry::MultiLineString(
      lines
        .iter()
        .map(|line| simplify_linestring(line, tolerance))
        .collect(),
    ),
    Geometry::Polygon(polygon) => Geometry::Polygon(simplify_polygon(polygon, tolerance)),
    Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
      polygons
        .iter()
        .map(|polygon| simplify_polygon(polygon, tolerance))
        .collect(),
    ),
  }
}
