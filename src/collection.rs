use serde_json::Value;
use tracing::{debug, trace};

use crate::geom::{Feature, FeatureCollection, Geometry, LineString};
use crate::geom_ops::simplify_geometry;
use crate::rdp::simplify_line_indices;

/// Default tolerance, in degrees, for longitude/latitude boundary data.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Counts gathered while simplifying a collection. `simplified` and the
/// point counts only cover features with lines or rings; points are never
/// simplified and are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifySummary {
  pub features: usize,
  pub simplified: usize,
  pub points_before: usize,
  pub points_after: usize,
}

impl SimplifySummary {
  pub fn merge(&mut self, other: &SimplifySummary) {
    self.features += other.features;
    self.simplified += other.simplified;
    self.points_before += other.points_before;
    self.points_after += other.points_after;
  }
}

impl FeatureCollection {
  pub fn simplify(&self, tolerance: f64) -> FeatureCollection {
    FeatureCollection {
      kind: self.kind,
      features: self
        .features
        .iter()
        .map(|feature| Feature {
          kind: feature.kind,
          id: feature.id.clone(),
          geometry: feature
            .geometry
            .as_ref()
            .map(|geometry| simplify_geometry(geometry, tolerance)),
          properties: feature.properties.clone(),
          foreign_members: feature.foreign_members.clone(),
        })
        .collect(),
      foreign_members: self.foreign_members.clone(),
    }
  }
}

// picks the surviving positions out of the original array, so kept points
// come back exactly as they were written
fn simplify_positions(
  positions: &Value,
  line: &LineString,
  tolerance: f64,
  counts: &mut SimplifySummary,
) -> Option<Value> {
  let originals = positions.as_array()?;
  if originals.len() != line.points.len() {
    return None;
  }
  let kept = simplify_line_indices(&line.points, tolerance);
  counts.points_before += originals.len();
  counts.points_after += kept.len();
  Some(Value::Array(
    kept.into_iter().map(|i| originals[i].clone()).collect(),
  ))
}

fn simplify_lines(
  lines_value: &Value,
  lines: &[LineString],
  tolerance: f64,
  counts: &mut SimplifySummary,
) -> Option<Value> {
  let originals = lines_value.as_array()?;
  if originals.len() != lines.len() {
    return None;
  }
  let mut out = Vec::with_capacity(lines.len());
  for (positions, line) in originals.iter().zip(lines) {
    out.push(simplify_positions(positions, line, tolerance, counts)?);
  }
  Some(Value::Array(out))
}

// returns the simplified copy of a single feature, or None when it has to be
// passed through as it is
fn simplify_feature_value(
  feature: &Value,
  tolerance: f64,
  summary: &mut SimplifySummary,
) -> Option<Value> {
  let geometry_value = feature.as_object()?.get("geometry")?;
  if geometry_value.is_null() {
    return None;
  }
  let geometry: Geometry = match serde_json::from_value(geometry_value.clone()) {
    Ok(geometry) => geometry,
    Err(e) => {
      let kind = geometry_value.get("type").cloned().unwrap_or_default();
      trace!("leaving geometry of type {} untouched: {}", kind, e);
      return None;
    }
  };
  let coordinates = geometry_value.get("coordinates")?;

  let mut counts = SimplifySummary::default();
  let simplified = match &geometry {
    Geometry::Point(_) | Geometry::MultiPoint(_) => return None,
    Geometry::LineString(line) => simplify_positions(coordinates, line, tolerance, &mut counts)?,
    Geometry::MultiLineString(lines) => simplify_lines(coordinates, lines, tolerance, &mut counts)?,
    Geometry::Polygon(polygon) => {
      simplify_lines(coordinates, &polygon.rings, tolerance, &mut counts)?
    }
    Geometry::MultiPolygon(polygons) => {
      let originals = coordinates.as_array()?;
      if originals.len() != polygons.len() {
        return None;
      }
      let mut out = Vec::with_capacity(polygons.len());
      for (rings, polygon) in originals.iter().zip(polygons) {
        out.push(simplify_lines(rings, &polygon.rings, tolerance, &mut counts)?);
      }
      Value::Array(out)
    }
  };

  summary.simplified += 1;
  summary.points_before += counts.points_before;
  summary.points_after += counts.points_after;

  // only the coordinates change; bbox and any foreign members stay
  let mut geometry_out = geometry_value.clone();
  geometry_out
    .as_object_mut()?
    .insert("coordinates".to_string(), simplified);
  let mut feature_out = feature.clone();
  feature_out
    .as_object_mut()?
    .insert("geometry".to_string(), geometry_out);
  Some(feature_out)
}

/// Simplifies every feature of a GeoJSON feature collection, returning a new
/// value alongside point counts. Anything that is not a collection with a
/// `features` array comes back unchanged, as does every feature whose
/// geometry is missing or of an unsupported kind.
pub fn simplify_collection_with_summary(
  collection: &Value,
  tolerance: f64,
) -> (Value, SimplifySummary) {
  let mut summary = SimplifySummary::default();

  let features = match collection.get("features") {
    Some(Value::Array(features)) => features,
    _ => {
      debug!("input is not a feature collection, passing through");
      return (collection.clone(), summary);
    }
  };

  let simplified_features: Vec<Value> = features
    .iter()
    .map(|feature| {
      summary.features += 1;
      simplify_feature_value(feature, tolerance, &mut summary).unwrap_or_else(|| feature.clone())
    })
    .collect();

  let mut out = collection.clone();
  if let Some(map) = out.as_object_mut() {
    map.insert("features".to_string(), Value::Array(simplified_features));
  }

  debug!(
    "simplified {}/{} features at tolerance {}, {} -> {} points",
    summary.simplified, summary.features, tolerance, summary.points_before, summary.points_after
  );
  (out, summary)
}

pub fn simplify_collection(collection: &Value, tolerance: f64) -> Value {
  simplify_collection_with_summary(collection, tolerance).0
}
