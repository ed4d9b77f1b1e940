//! Cell reconciliation: collapse overlapping partitions into a canonical,
//! non-overlapping cell decomposition.
//!
//! Independent local-index compactions of the same logical region can leave
//! several physical partitions whose rectangles all cover the same area.
//! Downstream consumers need a single non-overlapping decomposition, so
//! overlapping partitions are unioned into one enlarged cell rather than
//! reported as separate regions.

use crate::error::{GeoUnionError, Result};
use crate::global_index::GlobalIndex;
use crate::types::CellInfo;
use std::path::Path;

/// Reconcile the partitions of a loaded global index into canonical cells.
///
/// Partitions are visited in load order. Each partition either expands the
/// single cell it intersects, or starts a new cell when it intersects none.
/// A partition intersecting two or more of the cells accumulated so far is an
/// unrecoverable data error ([`GeoUnionError::AmbiguousOverlap`]): there is
/// no deterministic policy for a multi-way merge, and silently picking one
/// would leave overlapping output cells.
///
/// Expansion can cause a later partition to newly intersect an earlier,
/// already-expanded cell. That is intended: expansion strictly grows
/// coverage, so it can only merge more, never split.
///
/// Cell ids are assigned sequentially (1-based) as cells are created; they
/// are unrelated to the source partition ids.
pub fn reconcile(index: &GlobalIndex) -> Result<Vec<CellInfo>> {
    let mut cells: Vec<CellInfo> = Vec::new();
    for partition in index {
        let mut matched: Option<usize> = None;
        for (i, cell) in cells.iter().enumerate() {
            if partition.rect.intersects(&cell.rect) {
                if matched.is_some() {
                    return Err(GeoUnionError::AmbiguousOverlap {
                        partition: partition.id,
                    });
                }
                matched = Some(i);
            }
        }
        match matched {
            Some(i) => cells[i].rect.expand(&partition.rect),
            None => cells.push(CellInfo::new(cells.len() as u64 + 1, partition.rect)),
        }
    }
    Ok(cells)
}

/// Canonical cells of a dataset directory, or `None` if the directory is not
/// an indexed dataset.
pub fn cells_of<P: AsRef<Path>>(dir: P) -> Result<Option<Vec<CellInfo>>> {
    match GlobalIndex::load_dir(dir)? {
        Some(index) => Ok(Some(reconcile(&index)?)),
        None => Ok(None),
    }
}
