//! Local-index signature detection.
//!
//! Index writers emit a fixed 64-bit marker as the first eight bytes of any
//! data block they format as a locally indexed (tree-structured) block. This
//! is a data-format convention, not a checksum: classification is an exact
//! byte comparison against the marker's big-endian encoding, nothing more.

use crate::error::{GeoUnionError, Result};
use crate::global_index::MASTER_FILE_NAME;
use crate::types::Partition;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Sentinel value written at the start of every locally indexed block.
pub const LOCAL_INDEX_MARKER: i64 = -0x0001_2345_6789_10;

/// Big-endian encoding of [`LOCAL_INDEX_MARKER`], the exact byte sequence a
/// block must start with.
pub const LOCAL_INDEX_MARKER_BYTES: [u8; 8] = LOCAL_INDEX_MARKER.to_be_bytes();

/// Classify whether a data chunk is stored as a locally indexed block.
///
/// For a directory, the representative chunk is the file referenced by the
/// first partition listed in the master index artifact; an index that lists
/// no partitions is a [`GeoUnionError::MissingIndex`] error. A plain file is
/// inspected directly.
///
/// A chunk shorter than the marker is simply not locally indexed: the short
/// read answers `Ok(false)`, never an error.
pub fn is_locally_indexed<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let chunk = if path.is_dir() {
        resolve_representative_chunk(path)?
    } else {
        path.to_path_buf()
    };

    let file = File::open(&chunk)?;
    let mut stream = codec_reader(&chunk, file)?;
    let mut signature = [0u8; LOCAL_INDEX_MARKER_BYTES.len()];
    match stream.read_exact(&mut signature) {
        Ok(()) => Ok(signature == LOCAL_INDEX_MARKER_BYTES),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// The first listed partition's data file, resolved against the directory.
fn resolve_representative_chunk(dir: &Path) -> Result<PathBuf> {
    let master = dir.join(MASTER_FILE_NAME);
    let reader = BufReader::new(File::open(&master)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let first: Partition = serde_json::from_str(&line)?;
        return Ok(dir.join(first.filename));
    }
    Err(GeoUnionError::MissingIndex(dir.to_path_buf()))
}

/// Wrap the chunk stream in a decompressing reader when the file extension
/// names a known codec.
fn codec_reader(path: &Path, file: File) -> io::Result<Box<dyn Read>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("zst") | Some("zstd") => Ok(Box::new(zstd::stream::read::Decoder::new(file)?)),
        _ => Ok(Box::new(file)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rectangle;
    use std::io::Write;

    fn write_chunk(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_marker_bytes_are_big_endian() {
        assert_eq!(LOCAL_INDEX_MARKER_BYTES.len(), 8);
        assert_eq!(
            i64::from_be_bytes(LOCAL_INDEX_MARKER_BYTES),
            LOCAL_INDEX_MARKER
        );
    }

    #[test]
    fn test_file_with_marker_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = LOCAL_INDEX_MARKER_BYTES.to_vec();
        contents.extend_from_slice(b"tree payload follows");
        let chunk = write_chunk(dir.path(), "part-00000", &contents);
        assert!(is_locally_indexed(&chunk).unwrap());
    }

    #[test]
    fn test_file_without_marker_is_not_detected() {
        let dir = tempfile::tempdir().unwrap();
        let chunk = write_chunk(dir.path(), "part-00000", &[0u8; 64]);
        assert!(!is_locally_indexed(&chunk).unwrap());
    }

    #[test]
    fn test_short_chunk_is_false_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let chunk = write_chunk(dir.path(), "part-00000", &LOCAL_INDEX_MARKER_BYTES[..5]);
        assert!(!is_locally_indexed(&chunk).unwrap());

        let empty = write_chunk(dir.path(), "part-00001", &[]);
        assert!(!is_locally_indexed(&empty).unwrap());
    }

    #[test]
    fn test_compressed_chunk_is_decompressed_before_inspection() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = LOCAL_INDEX_MARKER_BYTES.to_vec();
        contents.extend_from_slice(b"payload");
        let compressed = zstd::stream::encode_all(&contents[..], 3).unwrap();
        let chunk = write_chunk(dir.path(), "part-00000.zst", &compressed);
        assert!(is_locally_indexed(&chunk).unwrap());
    }

    #[test]
    fn test_directory_resolves_first_partition() {
        let dir = tempfile::tempdir().unwrap();
        write_chunk(dir.path(), "part-00000", &LOCAL_INDEX_MARKER_BYTES);
        let partition = Partition {
            id: 1,
            rect: Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap(),
            filename: "part-00000".to_string(),
            record_count: 10,
            size: 8,
        };
        let line = serde_json::to_string(&partition).unwrap() + "\n";
        write_chunk(dir.path(), MASTER_FILE_NAME, line.as_bytes());

        assert!(is_locally_indexed(dir.path()).unwrap());
    }

    #[test]
    fn test_directory_with_empty_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_chunk(dir.path(), MASTER_FILE_NAME, b"");
        let err = is_locally_indexed(dir.path()).unwrap_err();
        assert!(matches!(err, GeoUnionError::MissingIndex(_)));
    }

    #[test]
    fn test_directory_without_master_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = is_locally_indexed(dir.path()).unwrap_err();
        assert!(matches!(err, GeoUnionError::Io(_)));
    }
}
