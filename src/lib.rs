//! Boundary simplification for GeoJSON map data.
//!
//! Polygon rings and lines are reduced with Ramer-Douglas-Peucker before
//! they reach the map renderer. Simplification is pure: inputs are never
//! modified, and input that cannot be simplified comes back unchanged.

pub mod collection;
pub mod config;
pub mod error;
pub mod geom;
pub mod geom_ops;
pub mod io;
pub mod rdp;

pub use collection::{
  simplify_collection, simplify_collection_with_summary, SimplifySummary, DEFAULT_TOLERANCE,
};
pub use config::BatchConfig;
pub use error::{Error, Result};
pub use geom::{Feature, FeatureCollection, Geometry, LineString, Point, Polygon};
pub use geom_ops::simplify_geometry;
pub use rdp::{perpendicular_distance, simplify_line, simplify_line_indices};
