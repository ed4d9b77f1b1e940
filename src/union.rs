//! Bounded-memory associative union of geometry streams.
//!
//! Union is associative and commutative, so an unbounded stream can be
//! reduced under a fixed memory cap: buffer geometries, and whenever the
//! buffer reaches its threshold, collapse the whole buffer into its union
//! and keep only the result. Flushing early, late, or at several aggregation
//! tiers never changes the final answer; it only trades peak memory against
//! per-call overhead of the underlying boolean operation.

use crate::error::{GeoUnionError, Result};
use crate::geometry::Geometry;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default flush threshold for union accumulators.
pub const DEFAULT_UNION_THRESHOLD: usize = 5_000_000;

/// Accumulates geometries and keeps memory bounded at `O(threshold)` by
/// flushing partial unions.
///
/// The buffer transiently holds `threshold` elements at the moment a flush
/// triggers, and at most `threshold - 1` plus the running partial result
/// between flushes.
pub struct BoundedUnionAccumulator {
    buffer: Vec<Geometry>,
    threshold: usize,
}

impl BoundedUnionAccumulator {
    /// Create an accumulator flushing at the given buffer size.
    pub fn new(threshold: usize) -> Self {
        assert!(threshold >= 1, "Union threshold must be at least 1");
        Self {
            buffer: Vec::new(),
            threshold,
        }
    }

    /// Create an accumulator with the default threshold.
    pub fn with_default_threshold() -> Self {
        Self::new(DEFAULT_UNION_THRESHOLD)
    }

    /// Number of geometries currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffer one geometry, flushing a partial union if the buffer has
    /// reached the threshold.
    pub fn offer(&mut self, geometry: Geometry) {
        self.buffer.push(geometry);
        if self.buffer.len() >= self.threshold {
            self.flush();
        }
    }

    /// Collapse the whole buffer into its union, leaving one element.
    ///
    /// Atomic relative to the external contract: callers never observe a
    /// half-flushed buffer.
    fn flush(&mut self) {
        let flushed = self.buffer.len();
        let mut parts = std::mem::take(&mut self.buffer).into_iter();
        if let Some(first) = parts.next() {
            self.buffer.push(union_all(first, parts));
        }
        debug!("flushed {} buffered geometries into a partial union", flushed);
    }

    /// Union everything still buffered and return the result, consuming the
    /// accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`GeoUnionError::EmptyAccumulator`] if no geometry was ever
    /// offered; with nothing buffered there is no identity element to
    /// return.
    pub fn drain(mut self) -> Result<Geometry> {
        let mut parts = std::mem::take(&mut self.buffer).into_iter();
        match parts.next() {
            Some(first) => Ok(union_all(first, parts)),
            None => Err(GeoUnionError::EmptyAccumulator),
        }
    }

    /// Drain and flatten a multi-part result into simple geometries.
    pub fn drain_decomposed(self) -> Result<Vec<Geometry>> {
        Ok(self.drain()?.decompose())
    }
}

fn union_all(first: Geometry, rest: impl Iterator<Item = Geometry>) -> Geometry {
    rest.fold(first, |acc, geometry| acc.union(&geometry))
}

/// Single-pass union over a stream of WKT shape records, one per line.
///
/// Blank lines are skipped. The result may be a multi-part collection when
/// the inputs are spatially disjoint; callers emitting simple geometries
/// should [`Geometry::decompose`] it.
pub fn union_stream<R: BufRead>(reader: R, threshold: usize) -> Result<Geometry> {
    let mut accumulator = BoundedUnionAccumulator::new(threshold);
    for line in reader.lines() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        accumulator.offer(Geometry::from_wkt(record)?);
    }
    accumulator.drain()
}

/// Union of all shape records in a file, decomposed into disjoint simple
/// geometries.
pub fn union_file<P: AsRef<Path>>(path: P, threshold: usize) -> Result<Vec<Geometry>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(union_stream(reader, threshold)?.decompose())
}
