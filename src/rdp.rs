// Ramer-Douglas-Peucker polyline simplification.
//
// The classic formulation recurses on both halves around the point furthest
// from the baseline. Boundary rings can hold tens of thousands of points, so
// the ranges still to be examined are kept on an explicit stack instead; the
// output is identical to the recursive version.

use crate::geom::Point;

/// Distance from `point` to the infinite line through `line_start` and
/// `line_end`. Falls back to the plain euclidean distance to `line_start`
/// when both line points coincide.
pub fn perpendicular_distance(point: &Point, line_start: &Point, line_end: &Point) -> f64 {
  if line_start.coincides(line_end) {
    return (point.x - line_start.x).hypot(point.y - line_start.y);
  }

  let dx = line_end.x - line_start.x;
  let dy = line_end.y - line_start.y;
  let numerator =
    dy * point.x - dx * point.y + line_end.x * line_start.y - line_end.y * line_start.x;
  numerator.abs() / (dx * dx + dy * dy).sqrt()
}

// index and distance of the interior point furthest from the baseline
// first..=last. ties go to the lowest index.
fn furthest_point(points: &[Point], first: usize, last: usize) -> (usize, f64) {
  let mut index = first + 1;
  let mut max_distance = f64::NEG_INFINITY;
  for (i, point) in points.iter().enumerate().take(last).skip(first + 1) {
    let distance = perpendicular_distance(point, &points[first], &points[last]);
    if distance > max_distance {
      index = i;
      max_distance = distance;
    }
  }
  (index, max_distance)
}

/// Indices of the points kept when simplifying `points`, in ascending order.
/// Inputs of two points or fewer keep every index.
pub fn simplify_line_indices(points: &[Point], tolerance: f64) -> Vec<usize> {
  let len = points.len();
  if len <= 2 {
    return (0..len).collect();
  }

  let mut keep = vec![false; len];
  keep[0] = true;
  keep[len - 1] = true;

  let mut ranges = vec![(0, len - 1)];
  while let Some((first, last)) = ranges.pop() {
    if last - first < 2 {
      // no interior points
      continue;
    }
    let (index, max_distance) = furthest_point(points, first, last);
    if max_distance > tolerance {
      keep[index] = true;
      ranges.push((index, last));
      ranges.push((first, index));
    }
  }

  keep
    .into_iter()
    .enumerate()
    .filter_map(|(i, kept)| if kept { Some(i) } else { None })
    .collect()
}

/// Simplifies a polyline, keeping only the points that deviate from the
/// simplified shape by more than `tolerance`. Inputs of two points or fewer
/// are returned as they are.
pub fn simplify_line(points: &[Point], tolerance: f64) -> Vec<Point> {
  simplify_line_indices(points, tolerance)
    .into_iter()
    .map(|i| points[i].clone())
    .collect()
}
