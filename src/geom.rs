use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A GeoJSON position. Ordinates past `x` and `y` (altitude and anything
/// after it) are kept in `extra` and written back out, but never used for
/// distance computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Point {
  pub x: f64,
  pub y: f64,
  pub extra: Vec<f64>,
}

impl Point {
  pub fn new(x: f64, y: f64) -> Point {
    Point {
      x,
      y,
      extra: Vec::new(),
    }
  }

  /// Compares the planar coordinates only.
  pub fn coincides(&self, other: &Point) -> bool {
    self.x == other.x && self.y == other.y
  }
}

#[derive(Debug)]
pub struct InvalidPosition(usize);

impl fmt::Display for InvalidPosition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "a position needs at least two coordinates, got {}",
      self.0
    )
  }
}

impl TryFrom<Vec<f64>> for Point {
  type Error = InvalidPosition;

  fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
    match coords.as_slice() {
      [x, y, extra @ ..] => Ok(Point {
        x: *x,
        y: *y,
        extra: extra.to_vec(),
      }),
      _ => Err(InvalidPosition(coords.len())),
    }
  }
}

impl From<Point> for Vec<f64> {
  fn from(p: Point) -> Self {
    let mut coords = Vec::with_capacity(2 + p.extra.len());
    coords.push(p.x);
    coords.push(p.y);
    coords.extend(p.extra);
    coords
  }
}

impl From<(f64, f64)> for Point {
  fn from((x, y): (f64, f64)) -> Self {
    Point::new(x, y)
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineString {
  pub points: Vec<Point>,
}

impl From<Vec<(f64, f64)>> for LineString {
  fn from(coords: Vec<(f64, f64)>) -> Self {
    LineString {
      points: coords.into_iter().map(Point::from).collect(),
    }
  }
}

/// Outer ring first, then holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
  pub rings: Vec<LineString>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
  Point(Point),
  MultiPoint(Vec<Point>),
  LineString(LineString),
  MultiLineString(Vec<LineString>),
  Polygon(Polygon),
  MultiPolygon(Vec<Polygon>),
}

impl Geometry {
  /// The GeoJSON `type` name of this geometry.
  pub fn kind(&self) -> &'static str {
    match self {
      Geometry::Point(_) => "Point",
      Geometry::MultiPoint(_) => "MultiPoint",
      Geometry::LineString(_) => "LineString",
      Geometry::MultiLineString(_) => "MultiLineString",
      Geometry::Polygon(_) => "Polygon",
      Geometry::MultiPolygon(_) => "MultiPolygon",
    }
  }

  pub fn point_count(&self) -> usize {
    match self {
      Geometry::Point(_) => 1,
      Geometry::MultiPoint(points) => points.len(),
      Geometry::LineString(line) => line.points.len(),
      Geometry::MultiLineString(lines) => lines.iter().map(|l| l.points.len()).sum(),
      Geometry::Polygon(polygon) => ring_point_count(polygon),
      Geometry::MultiPolygon(polygons) => polygons.iter().map(ring_point_count).sum(),
    }
  }
}

fn ring_point_count(polygon: &Polygon) -> usize {
  polygon.rings.iter().map(|r| r.points.len()).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
  Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
  FeatureCollection,
}

// a member that is present, even as null, is Some; only a missing one is None
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
  #[serde(rename = "type")]
  pub kind: FeatureType,
  #[serde(
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub id: Option<Value>,
  #[serde(default)]
  pub geometry: Option<Geometry>,
  #[serde(
    default,
    deserialize_with = "present",
    skip_serializing_if = "Option::is_none"
  )]
  pub properties: Option<Value>,
  #[serde(flatten)]
  pub foreign_members: Map<String, Value>,
}

impl Feature {
  pub fn new(geometry: Option<Geometry>) -> Feature {
    Feature {
      kind: FeatureType::Feature,
      id: None,
      geometry,
      properties: Some(Value::Null),
      foreign_members: Map::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
  #[serde(rename = "type")]
  pub kind: FeatureCollectionType,
  pub features: Vec<Feature>,
  #[serde(flatten)]
  pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
  pub fn new(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
      kind: FeatureCollectionType::FeatureCollection,
      features,
      foreign_members: Map::new(),
    }
  }
}
