//! Core value types: rectangles, cells, partitions, and job configuration.

use crate::error::{GeoUnionError, Result};
use crate::union::DEFAULT_UNION_THRESHOLD;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle with `x1 <= x2` and `y1 <= y2`.
///
/// Edge-adjacent rectangles do not count as intersecting, so a reconciled
/// cell decomposition may tile the plane with shared borders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rectangle {
    /// Create a rectangle from its min and max corners.
    ///
    /// # Errors
    ///
    /// Returns an error if min > max for either coordinate.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if x1 > x2 {
            return Err(GeoUnionError::InvalidInput(format!(
                "x1 ({}) must be <= x2 ({})",
                x1, x2
            )));
        }
        if y1 > y2 {
            return Err(GeoUnionError::InvalidInput(format!(
                "y1 ({}) must be <= y2 ({})",
                y1, y2
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Check whether the interiors of two rectangles overlap.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// Grow this rectangle in place to the minimum bounding rectangle
    /// covering both.
    pub fn expand(&mut self, other: &Rectangle) {
        self.x1 = self.x1.min(other.x1);
        self.y1 = self.y1.min(other.y1);
        self.x2 = self.x2.max(other.x2);
        self.y2 = self.y2.max(other.y2);
    }
}

/// A numbered rectangular cell of the canonical decomposition.
///
/// Ids are 1-based and assigned at reconciliation time; they are not stable
/// across reconciliation runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub id: u64,
    pub rect: Rectangle,
}

impl CellInfo {
    pub fn new(id: u64, rect: Rectangle) -> Self {
        Self { id, rect }
    }
}

/// One physical chunk of a partitioned dataset, as recorded in the master
/// index artifact.
///
/// Partitions are produced by an external index writer and loaded verbatim;
/// decoding yields owned records, so nothing here ever aliases a reader's
/// scratch buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub id: u64,
    pub rect: Rectangle,
    /// Data file referenced by this partition, relative to the dataset
    /// directory.
    pub filename: String,
    pub record_count: u64,
    pub size: u64,
}

/// Configuration for union jobs.
///
/// # Example
///
/// ```rust
/// use geounion::Config;
///
/// let json = r#"{
///     "union_threshold": 1000,
///     "workers": 4
/// }"#;
/// let config: Config = Config::from_json(json).unwrap();
/// assert_eq!(config.union_threshold, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of geometries to buffer before a partial-union flush.
    #[serde(default = "Config::default_union_threshold")]
    pub union_threshold: usize,

    /// Number of partial-reduction workers; 0 means use the rayon pool size.
    #[serde(default)]
    pub workers: usize,
}

impl Config {
    const fn default_union_threshold() -> usize {
        DEFAULT_UNION_THRESHOLD
    }

    pub fn with_union_threshold(mut self, threshold: usize) -> Self {
        assert!(threshold >= 1, "Union threshold must be at least 1");
        self.union_threshold = threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.union_threshold == 0 {
            return Err("Union threshold must be at least 1".to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            union_threshold: Self::default_union_threshold(),
            workers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_new_validates_corners() {
        assert!(Rectangle::new(0.0, 0.0, 10.0, 10.0).is_ok());
        assert!(Rectangle::new(10.0, 0.0, 0.0, 10.0).is_err());
        assert!(Rectangle::new(0.0, 10.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn test_rectangle_intersects() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(5.0, 5.0, 15.0, 15.0).unwrap();
        let c = Rectangle::new(20.0, 20.0, 30.0, 30.0).unwrap();

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rectangle_edge_adjacency_is_not_intersection() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(10.0, 0.0, 20.0, 10.0).unwrap();
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_rectangle_expand() {
        let mut a = Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Rectangle::new(5.0, 5.0, 15.0, 15.0).unwrap();
        a.expand(&b);
        assert_eq!(a, Rectangle::new(0.0, 0.0, 15.0, 15.0).unwrap());

        // Expanding by a contained rectangle is a no-op.
        let inner = Rectangle::new(1.0, 1.0, 2.0, 2.0).unwrap();
        let before = a;
        a.expand(&inner);
        assert_eq!(a, before);
    }

    #[test]
    fn test_partition_record_round_trip() {
        let partition = Partition {
            id: 7,
            rect: Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap(),
            filename: "part-00007".to_string(),
            record_count: 1234,
            size: 65536,
        };
        let line = serde_json::to_string(&partition).unwrap();
        let decoded: Partition = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded, partition);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.union_threshold, DEFAULT_UNION_THRESHOLD);
        assert_eq!(config.workers, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_rejects_zero_threshold() {
        assert!(Config::from_json(r#"{"union_threshold": 0}"#).is_err());
    }

    #[test]
    #[should_panic(expected = "Union threshold must be at least 1")]
    fn test_config_with_invalid_threshold() {
        let _ = Config::default().with_union_threshold(0);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default().with_union_threshold(512).with_workers(8);
        let json = config.to_json().unwrap();
        let decoded = Config::from_json(&json).unwrap();
        assert_eq!(decoded.union_threshold, 512);
        assert_eq!(decoded.workers, 8);
    }
}
