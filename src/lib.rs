//! Partition reconciliation and bounded-memory geometric union for spatially
//! indexed datasets.
//!
//! ```rust
//! use geounion::{BoundedUnionAccumulator, Geometry};
//!
//! let mut accumulator = BoundedUnionAccumulator::new(2);
//! accumulator.offer(Geometry::from_wkt("POLYGON((0 0,1 0,1 1,0 1,0 0))")?);
//! accumulator.offer(Geometry::from_wkt("POLYGON((2 0,3 0,3 1,2 1,2 0))")?);
//! accumulator.offer(Geometry::from_wkt("POLYGON((4 0,5 0,5 1,4 1,4 0))")?);
//!
//! let parts = accumulator.drain_decomposed()?;
//! assert_eq!(parts.len(), 3);
//! # Ok::<(), geounion::GeoUnionError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod global_index;
pub mod pipeline;
pub mod reconcile;
pub mod signature;
pub mod types;
pub mod union;

pub use error::{GeoUnionError, Result};

pub use geometry::Geometry;

pub use geo::{MultiPolygon, Polygon};

pub use global_index::{GlobalIndex, MASTER_FILE_NAME};

pub use reconcile::{cells_of, reconcile};

pub use signature::{LOCAL_INDEX_MARKER, LOCAL_INDEX_MARKER_BYTES, is_locally_indexed};

pub use types::{CellInfo, Config, Partition, Rectangle};

pub use union::{BoundedUnionAccumulator, DEFAULT_UNION_THRESHOLD, union_file, union_stream};

pub use pipeline::UnionPipeline;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoUnionError, Result};

    pub use crate::{BoundedUnionAccumulator, Geometry, UnionPipeline};

    pub use crate::{CellInfo, Config, GlobalIndex, Partition, Rectangle};

    pub use crate::{cells_of, is_locally_indexed, union_file, union_stream};
}
