//! Global index over the partitions of a dataset directory.
//!
//! The global index is bulk-loaded once from the directory's master index
//! artifact and read-mostly afterward: iteration preserves load order (the
//! reconciliation algorithm depends on it) while an rstar R-tree over the
//! partition envelopes answers "which files cover this region" queries.

use crate::error::{GeoUnionError, Result};
use crate::types::{Partition, Rectangle};
use log::debug;
use rstar::primitives::{GeomWithData, Rectangle as Envelope};
use rstar::{AABB, RTree};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Name of the master index artifact inside a dataset directory.
///
/// Its presence is what distinguishes an indexed dataset from a plain
/// directory of files; an empty master file is still an indexed dataset.
pub const MASTER_FILE_NAME: &str = "_master";

type PartitionEnvelope = GeomWithData<Envelope<[f64; 2]>, usize>;

/// In-memory, bulk-loaded collection of the partitions of one dataset.
///
/// Safe for concurrent reads once loaded; loading itself is a one-shot,
/// single-writer operation.
pub struct GlobalIndex {
    partitions: Vec<Partition>,
    tree: RTree<PartitionEnvelope>,
    loaded: bool,
}

impl GlobalIndex {
    /// Create an empty, not-yet-loaded index.
    pub fn new() -> Self {
        Self {
            partitions: Vec::new(),
            tree: RTree::new(),
            loaded: false,
        }
    }

    /// Load the given partitions into this index.
    ///
    /// # Errors
    ///
    /// Returns [`GeoUnionError::AlreadyLoaded`] if called a second time on
    /// the same instance; the index is never re-loaded.
    pub fn bulk_load(&mut self, partitions: Vec<Partition>) -> Result<()> {
        if self.loaded {
            return Err(GeoUnionError::AlreadyLoaded);
        }
        let envelopes = partitions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                GeomWithData::new(
                    Envelope::from_corners([p.rect.x1, p.rect.y1], [p.rect.x2, p.rect.y2]),
                    i,
                )
            })
            .collect();
        self.tree = RTree::bulk_load(envelopes);
        self.partitions = partitions;
        self.loaded = true;
        Ok(())
    }

    /// Iterate over partitions in load order. Lazy and restartable.
    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    /// Partitions whose rectangles cover any part of the query region.
    pub fn overlapping(&self, query: &Rectangle) -> Vec<&Partition> {
        let envelope = AABB::from_corners([query.x1, query.y1], [query.x2, query.y2]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| &self.partitions[entry.data])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Load the global index of a dataset directory from its master index
    /// artifact, one JSON partition record per line.
    ///
    /// Returns `Ok(None)` when the artifact is absent, meaning the directory
    /// is not an indexed dataset. This is distinct from an index that is
    /// present but empty, which loads as an empty `GlobalIndex`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Option<GlobalIndex>> {
        let master = dir.as_ref().join(MASTER_FILE_NAME);
        if !master.exists() {
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&master)?);
        let mut partitions = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let partition: Partition = serde_json::from_str(&line)?;
            partitions.push(partition);
        }
        debug!(
            "loaded {} partition(s) from {}",
            partitions.len(),
            master.display()
        );

        let mut index = GlobalIndex::new();
        index.bulk_load(partitions)?;
        Ok(Some(index))
    }
}

impl Default for GlobalIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a GlobalIndex {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
