use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn maybe_decompress(data: Vec<u8>) -> Result<Vec<u8>> {
  if data.starts_with(&GZIP_MAGIC) {
    let mut out = Vec::with_capacity(data.len() * 4);
    GzDecoder::new(data.as_slice()).read_to_end(&mut out)?;
    return Ok(out);
  }
  Ok(data)
}

fn is_gzip_path(path: &Path) -> bool {
  path.extension().map_or(false, |ext| ext == "gz")
}

/// `.geojson` and `.json`, optionally followed by `.gz`.
pub fn is_geojson_path(path: &Path) -> bool {
  let name = match path.file_name().and_then(|n| n.to_str()) {
    Some(name) => name.to_ascii_lowercase(),
    None => return false,
  };
  let name = name.strip_suffix(".gz").unwrap_or(&name);
  name.ends_with(".geojson") || name.ends_with(".json")
}

/// Reads a GeoJSON document, gunzipping it first if it is compressed.
pub fn read_geojson(path: &Path) -> Result<Value> {
  let mut data = Vec::new();
  BufReader::new(File::open(path)?).read_to_end(&mut data)?;
  let data = maybe_decompress(data)?;
  Ok(serde_json::from_slice(&data)?)
}

/// Writes compact JSON, gzipped when the path ends in `.gz`.
pub fn write_geojson(path: &Path, value: &Value) -> Result<()> {
  let file = BufWriter::new(File::create(path)?);
  if is_gzip_path(path) {
    let mut gz = GzEncoder::new(file, Compression::default());
    serde_json::to_writer(&mut gz, value)?;
    gz.finish()?.flush()?;
  } else {
    let mut file = file;
    serde_json::to_writer(&mut file, value)?;
    file.flush()?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn test_is_geojson_path() {
    assert!(is_geojson_path(&PathBuf::from("boundaries/constituencies.geojson")));
    assert!(is_geojson_path(&PathBuf::from("counties.json")));
    assert!(is_geojson_path(&PathBuf::from("counties.GeoJSON.gz")));
    assert!(!is_geojson_path(&PathBuf::from("counties.shp")));
    assert!(!is_geojson_path(&PathBuf::from("archive.gz")));
    assert!(!is_geojson_path(&PathBuf::from("/")));
  }

  #[test]
  fn test_maybe_decompress_plain() {
    let data = b"{\"type\":\"FeatureCollection\"}".to_vec();
    assert_eq!(maybe_decompress(data.clone()).unwrap(), data);
  }

  #[test]
  fn test_maybe_decompress_gzip() {
    let data = b"{\"type\":\"FeatureCollection\"}".to_vec();
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&data).unwrap();
    let compressed = gz.finish().unwrap();
    assert_eq!(maybe_decompress(compressed).unwrap(), data);
  }
}
