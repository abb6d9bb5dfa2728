use geojson_simplify::io::{read_geojson, write_geojson};
use geojson_simplify::{
  simplify_collection, simplify_collection_with_summary, FeatureCollection, Geometry,
  DEFAULT_TOLERANCE,
};
use serde_json::{json, Value};

fn constituency(name: &str, coordinates: Value) -> Value {
  json!({
    "type": "Feature",
    "id": name,
    "properties": { "name": name, "seats": 4 },
    "geometry": { "type": "MultiPolygon", "coordinates": coordinates }
  })
}

fn wobbly_ring(origin: f64, n: usize) -> Value {
  // a square with n points on its bottom edge, each a hair off the line
  let mut ring: Vec<Value> = (0..n)
    .map(|i| {
      let x = origin + i as f64 / n as f64;
      let y = origin + if i % 2 == 0 { 0.00001 } else { -0.00001 };
      json!([x, y])
    })
    .collect();
  ring.push(json!([origin + 1.0, origin]));
  ring.push(json!([origin + 1.0, origin + 1.0]));
  ring.push(json!([origin, origin + 1.0]));
  ring.push(json!([origin, origin + 0.00001]));
  Value::Array(ring)
}

#[test]
fn test_multipolygon_structure_preserved() {
  let input = json!({
    "type": "FeatureCollection",
    "features": [
      constituency(
        "Kerry",
        json!([[wobbly_ring(0.0, 400)], [wobbly_ring(5.0, 300), wobbly_ring(5.2, 50)]])
      ),
    ]
  });

  let (out, summary) = simplify_collection_with_summary(&input, DEFAULT_TOLERANCE);
  assert_eq!(summary.features, 1);
  assert_eq!(summary.simplified, 1);
  assert!(summary.points_after < summary.points_before / 10);

  let polygons = out["features"][0]["geometry"]["coordinates"]
    .as_array()
    .unwrap();
  assert_eq!(polygons.len(), 2);
  assert_eq!(polygons[0].as_array().unwrap().len(), 1);
  assert_eq!(polygons[1].as_array().unwrap().len(), 2);

  for (polygon_in, polygon_out) in input["features"][0]["geometry"]["coordinates"]
    .as_array()
    .unwrap()
    .iter()
    .zip(polygons)
  {
    for (ring_in, ring_out) in polygon_in
      .as_array()
      .unwrap()
      .iter()
      .zip(polygon_out.as_array().unwrap())
    {
      let ring_in = ring_in.as_array().unwrap();
      let ring_out = ring_out.as_array().unwrap();
      assert!(ring_out.len() < ring_in.len());
      assert_eq!(
        ring_out.first().unwrap()[0].as_f64(),
        ring_in.first().unwrap()[0].as_f64()
      );
      assert_eq!(
        ring_out.last().unwrap()[1].as_f64(),
        ring_in.last().unwrap()[1].as_f64()
      );
    }
  }
  assert_eq!(out["features"][0]["properties"], json!({ "name": "Kerry", "seats": 4 }));
  assert_eq!(out["features"][0]["id"], json!("Kerry"));
}

#[test]
fn test_repeated_simplification_is_stable() {
  let input = json!({
    "type": "FeatureCollection",
    "features": [constituency("Cork South-West", json!([[wobbly_ring(0.0, 250)]]))]
  });
  let once = simplify_collection(&input, 0.00005);
  let twice = simplify_collection(&once, 0.00005);
  assert_eq!(once, twice);
}

#[test]
fn test_json_and_typed_layers_agree() {
  let input = json!({
    "type": "FeatureCollection",
    "features": [
      constituency("Donegal", json!([[wobbly_ring(0.0, 120)]])),
      {
        "type": "Feature",
        "properties": { "name": "Tory Island lighthouse" },
        "geometry": { "type": "Point", "coordinates": [-8.25, 55.27] }
      }
    ]
  });

  let typed: FeatureCollection = serde_json::from_value(input.clone()).unwrap();
  let typed_out = serde_json::to_value(typed.simplify(DEFAULT_TOLERANCE)).unwrap();
  let json_out = simplify_collection(&input, DEFAULT_TOLERANCE);
  assert_eq!(typed_out, json_out);

  let geometry: Geometry =
    serde_json::from_value(json_out["features"][0]["geometry"].clone()).unwrap();
  assert_eq!(geometry.kind(), "MultiPolygon");
}

#[test]
fn test_round_trip_through_files() {
  let dir = tempfile::tempdir().unwrap();
  let input = json!({
    "type": "FeatureCollection",
    "features": [constituency("Sligo-Leitrim", json!([[wobbly_ring(0.0, 80)]]))]
  });

  let plain = dir.path().join("boundaries.geojson");
  let gzipped = dir.path().join("boundaries.geojson.gz");
  write_geojson(&plain, &input).unwrap();
  write_geojson(&gzipped, &input).unwrap();

  let raw = std::fs::read(&gzipped).unwrap();
  assert_eq!(&raw[..2], &[0x1f, 0x8b]);

  assert_eq!(read_geojson(&plain).unwrap(), input);
  assert_eq!(read_geojson(&gzipped).unwrap(), input);

  let simplified = simplify_collection(&read_geojson(&gzipped).unwrap(), DEFAULT_TOLERANCE);
  let out = dir.path().join("simplified.geojson");
  write_geojson(&out, &simplified).unwrap();
  assert_eq!(read_geojson(&out).unwrap(), simplified);
}

#[test]
fn test_missing_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let err = read_geojson(&dir.path().join("nope.geojson")).unwrap_err();
  assert!(matches!(err, geojson_simplify::Error::Io(_)));
}
