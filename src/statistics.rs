use cli_table::{print_stdout, Table, WithTitle};
use geojson_simplify::io::read_geojson;
use geojson_simplify::{simplify_geometry, Geometry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Table)]
struct KindStats {
  #[table(title = "Geometry")]
  kind: &'static str,
  #[table(title = "Features")]
  features: usize,
  #[table(title = "Points (before)")]
  points_before: usize,
  #[table(title = "Points (after)")]
  points_after: usize,
  #[table(title = "Kept")]
  kept: String,
}

pub struct StatisticsOutput {
  name: String,
  tolerance: f64,
  kind_stats: Vec<KindStats>,
  untouched: usize,
}

impl StatisticsOutput {
  pub fn print_cli_table(self) -> std::io::Result<()> {
    println!(
      "Statistics for {} at tolerance {}:",
      self.name, self.tolerance
    );
    print_stdout(self.kind_stats.with_title())?;
    println!("Features left untouched: {}", self.untouched);
    Ok(())
  }
}

fn kept_ratio(before: usize, after: usize) -> String {
  if before == 0 {
    return "-".to_string();
  }
  format!("{:.1}%", 100.0 * after as f64 / before as f64)
}

fn calculate_kind_stats(collection: &Value, tolerance: f64) -> (Vec<KindStats>, usize) {
  let mut by_kind = BTreeMap::<&'static str, (usize, usize, usize)>::new();
  let mut untouched = 0;

  let features = collection
    .get("features")
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or_default();
  for feature in features {
    let geometry = feature
      .get("geometry")
      .and_then(|g| serde_json::from_value::<Geometry>(g.clone()).ok());
    match geometry {
      Some(geometry) => {
        let simplified = simplify_geometry(&geometry, tolerance);
        let entry = by_kind.entry(geometry.kind()).or_default();
        entry.0 += 1;
        entry.1 += geometry.point_count();
        entry.2 += simplified.point_count();
      }
      None => untouched += 1,
    }
  }

  let stats = by_kind
    .into_iter()
    .map(|(kind, (features, before, after))| KindStats {
      kind,
      features,
      points_before: before,
      points_after: after,
      kept: kept_ratio(before, after),
    })
    .collect();
  (stats, untouched)
}

pub fn calculate_statistics(input: &Path, tolerance: f64) -> geojson_simplify::Result<StatisticsOutput> {
  let collection = read_geojson(input)?;
  let (kind_stats, untouched) = calculate_kind_stats(&collection, tolerance);
  Ok(StatisticsOutput {
    name: input.display().to_string(),
    tolerance,
    kind_stats,
    untouched,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_kind_stats() {
    let collection = json!({
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": {},
          "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 0.0001], [2, 0]] }
        },
        {
          "type": "Feature",
          "properties": {},
          "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 5], [2, 0]] }
        },
        {
          "type": "Feature",
          "properties": {},
          "geometry": { "type": "Point", "coordinates": [0, 0] }
        },
        { "type": "Feature", "properties": {}, "geometry": null }
      ]
    });
    let (stats, untouched) = calculate_kind_stats(&collection, 0.001);
    assert_eq!(untouched, 1);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].kind, "LineString");
    assert_eq!(stats[0].features, 2);
    assert_eq!(stats[0].points_before, 6);
    assert_eq!(stats[0].points_after, 5);
    assert_eq!(stats[1].kind, "Point");
    assert_eq!(stats[1].kept, "100.0%");
  }

  #[test]
  fn test_not_a_collection() {
    let (stats, untouched) = calculate_kind_stats(&json!({ "features": 3 }), 0.001);
    assert!(stats.is_empty());
    assert_eq!(untouched, 0);
  }

  #[test]
  fn test_kept_ratio() {
    assert_eq!(kept_ratio(0, 0), "-");
    assert_eq!(kept_ratio(8, 2), "25.0%");
  }
}
