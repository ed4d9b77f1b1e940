//! Error types for geounion operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by index loading, reconciliation, and union operations.
#[derive(Error, Debug)]
pub enum GeoUnionError {
    /// A `GlobalIndex` was bulk-loaded more than once.
    #[error("global index is already loaded")]
    AlreadyLoaded,

    /// A partition intersects two or more reconciled cells; there is no
    /// well-defined merge policy for a multi-way overlap.
    #[error("partition {partition} overlaps more than one reconciled cell")]
    AmbiguousOverlap { partition: u64 },

    /// A master index exists but lists no partitions, so no representative
    /// data chunk can be resolved.
    #[error("index at {} lists no partitions", .0.display())]
    MissingIndex(PathBuf),

    /// `drain` was called on an accumulator that never received a geometry.
    #[error("drain called on an accumulator with no buffered geometries")]
    EmptyAccumulator,

    /// Pipeline output path exists and the overwrite flag is not set.
    #[error("output path {} already exists and overwrite is not set", .0.display())]
    OutputExists(PathBuf),

    /// A master index line could not be decoded as a partition record.
    #[error("malformed partition record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// WKT parsing error.
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// A geometry record parsed, but is not an areal type the union supports.
    #[error("unsupported geometry type for union: {0}")]
    UnsupportedGeometry(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error during index or shape-record read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for geounion operations.
pub type Result<T> = std::result::Result<T, GeoUnionError>;
