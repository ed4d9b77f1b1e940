//! Multi-tier union pipeline.
//!
//! The distributed shape of the union job from the original map/reduce
//! deployment, kept intact because each tier is just the bounded accumulator
//! again: records pass through tagged with a constant grouping key, each
//! worker partially reduces its slice with a fresh accumulator, and a final
//! reduction collapses the concatenated partial outputs. Associativity of
//! the union guarantees the tiering never changes the emitted set of
//! disjoint geometries, only how much intermediate data exists at once.
//!
//! Workers share no mutable state; each accumulator is owned by exactly one
//! worker, so the partial tier is embarrassingly parallel.

use crate::error::{GeoUnionError, Result};
use crate::geometry::Geometry;
use crate::types::Config;
use crate::union::BoundedUnionAccumulator;
use log::info;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Grouping key for the shuffle stage. The union ignores category
/// distinctions, so every record in a run belongs to the one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnionKey;

/// Pass-through tier: forward a record unchanged under the constant key.
pub fn pass_through(geometry: Geometry) -> (UnionKey, Geometry) {
    (UnionKey, geometry)
}

/// Three-tier union reduction over a file of WKT shape records.
pub struct UnionPipeline {
    threshold: usize,
    workers: usize,
}

impl UnionPipeline {
    /// Build a pipeline from a job configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.union_threshold,
            workers: config.workers,
        }
    }

    /// Run the pipeline: read shape records from `input`, reduce, and write
    /// one WKT line per resulting disjoint geometry to `output`.
    ///
    /// # Errors
    ///
    /// Fails with [`GeoUnionError::OutputExists`] if `output` exists and
    /// `overwrite` is not set. Any tier failure aborts the whole run; no
    /// partial output is written.
    pub fn run<P: AsRef<Path>>(&self, input: P, output: P, overwrite: bool) -> Result<()> {
        let output = output.as_ref();
        if output.exists() {
            if !overwrite {
                return Err(GeoUnionError::OutputExists(output.to_path_buf()));
            }
            fs::remove_file(output)?;
        }

        let records = read_records(input.as_ref())?;
        let workers = if self.workers == 0 {
            rayon::current_num_threads()
        } else {
            self.workers
        };
        info!(
            "union pipeline: {} record(s) across {} worker(s), threshold {}",
            records.len(),
            workers,
            self.threshold
        );

        // Partial-reduction tier, one independent accumulator per worker.
        let chunk_size = records.len().div_ceil(workers).max(1);
        let chunks = into_chunks(records, chunk_size);
        let partials: Vec<Vec<Geometry>> = chunks
            .into_par_iter()
            .map(|chunk| reduce_tier(chunk.into_iter().map(|(_, g)| g), self.threshold))
            .collect::<Result<_>>()?;

        // Final tier over the concatenated partial outputs.
        let merged = reduce_tier(partials.into_iter().flatten(), self.threshold)?;
        info!("union pipeline: {} disjoint geometries", merged.len());

        let mut writer = BufWriter::new(File::create(output)?);
        for geometry in &merged {
            writeln!(writer, "{}", geometry.to_wkt())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One reduction tier: a fresh accumulator over the tier's input, drained
/// and decomposed into simple geometries.
fn reduce_tier(
    geometries: impl Iterator<Item = Geometry>,
    threshold: usize,
) -> Result<Vec<Geometry>> {
    let mut accumulator = BoundedUnionAccumulator::new(threshold);
    for geometry in geometries {
        accumulator.offer(geometry);
    }
    accumulator.drain_decomposed()
}

fn read_records(input: &Path) -> Result<Vec<(UnionKey, Geometry)>> {
    let reader = BufReader::new(File::open(input)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        records.push(pass_through(Geometry::from_wkt(record)?));
    }
    Ok(records)
}

fn into_chunks<T>(mut items: Vec<T>, chunk_size: usize) -> Vec<Vec<T>> {
    let mut chunks = Vec::new();
    while !items.is_empty() {
        let tail = items.split_off(items.len().min(chunk_size));
        chunks.push(items);
        items = tail;
    }
    chunks
}
