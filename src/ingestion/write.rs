//! Write functions - persist a chunk's rows as a CSV artifact

use crate::ingestion::types::{Artifact, ChunkBounds, Row};
use anyhow::{Context, Result};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Rows buffered between explicit flushes
pub const DEFAULT_FLUSH_ROWS: usize = 100_000;

/// File mode of written artifacts: owner read/write, everyone else read
#[cfg(unix)]
pub const ARTIFACT_MODE: u32 = 0o644;

/// Write `rows` to `<dir>/parts_{start}-{end}.csv` with a `city,street` header.
///
/// Rows go to a temporary file in `dir` first, which then replaces the
/// artifact. Re-running with the same bounds overwrites the previous file.
pub fn write_chunk(
    dir: &Path,
    rows: &[Row],
    bounds: ChunkBounds,
    flush_rows: usize,
) -> Result<Artifact> {
    let path = dir.join(bounds.artifact_name());
    info!("Writing {} rows to {:?}", rows.len(), path);

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    let mut writer = csv::Writer::from_writer(BufWriter::new(temp));
    // serialize() only emits the header with the first record
    if rows.is_empty() {
        writer.write_record(["city", "street"])?;
    }
    for (idx, row) in rows.iter().enumerate() {
        writer.serialize(row)?;
        if flush_rows > 0 && (idx + 1) % flush_rows == 0 {
            writer.flush()?;
            debug!("Flushed {} rows", idx + 1);
        }
    }

    let temp = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush buffer: {}", e.error()))?;
    // NamedTempFile creates files as 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(ARTIFACT_MODE))
            .with_context(|| format!("Failed to set permissions on {:?}", temp.path()))?;
    }
    temp.persist(&path)
        .with_context(|| format!("Failed to persist {:?}", path))?;

    Ok(Artifact {
        path,
        bounds,
        rows: rows.len(),
    })
}

/// Read an artifact back into rows
pub fn read_chunk(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let rows = reader
        .deserialize::<Row>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn bounds(start: usize, end: usize) -> ChunkBounds {
        ChunkBounds { start, end }
    }

    #[test]
    fn test_write_chunk_format() {
        let temp = tempdir().unwrap();
        let rows = vec![Row::new("A", "X"), Row::new("B", "X"), Row::new("B", "Y")];

        let artifact = write_chunk(temp.path(), &rows, bounds(0, 2), DEFAULT_FLUSH_ROWS).unwrap();

        assert_eq!(artifact.path, temp.path().join("parts_0-2.csv"));
        assert_eq!(artifact.rows, 3);
        let content = fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(content, "city,street\nA,X\nB,X\nB,Y\n");
    }

    #[test]
    fn test_write_then_read_back() {
        let temp = tempdir().unwrap();
        let rows = vec![
            Row::new("Kraków", "aleja Adama Mickiewicza"),
            Row::new("Kraków", "Rynek Główny"),
            Row::new("Nowy Sącz", "ulica \"Kolejowa\", boczna"),
        ];

        // small flush threshold exercises intermediate flushes
        let artifact = write_chunk(temp.path(), &rows, bounds(100, 200), 2).unwrap();
        let read = read_chunk(&artifact.path).unwrap();

        assert_eq!(read, rows);
    }

    #[test]
    fn test_empty_chunk_still_has_header() {
        let temp = tempdir().unwrap();

        let artifact = write_chunk(temp.path(), &[], bounds(5, 10), DEFAULT_FLUSH_ROWS).unwrap();

        assert_eq!(fs::read_to_string(&artifact.path).unwrap(), "city,street\n");
        assert!(read_chunk(&artifact.path).unwrap().is_empty());
    }

    #[test]
    fn test_rewrite_overwrites() {
        let temp = tempdir().unwrap();
        let first = vec![Row::new("A", "X"), Row::new("A", "Y")];
        let second = vec![Row::new("A", "Z")];

        write_chunk(temp.path(), &first, bounds(0, 1), DEFAULT_FLUSH_ROWS).unwrap();
        let artifact = write_chunk(temp.path(), &second, bounds(0, 1), DEFAULT_FLUSH_ROWS).unwrap();

        assert_eq!(read_chunk(&artifact.path).unwrap(), second);
        // no temporary files left behind
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_artifact_is_readable_by_group_and_others() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let artifact =
            write_chunk(temp.path(), &[Row::new("A", "X")], bounds(0, 1), DEFAULT_FLUSH_ROWS).unwrap();

        let mode = fs::metadata(&artifact.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, ARTIFACT_MODE);
        assert_eq!(mode & 0o044, 0o044);
    }

    #[test]
    fn test_write_creates_output_dir() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("out").join("pl");

        let artifact =
            write_chunk(&nested, &[Row::new("A", "X")], bounds(0, 1), DEFAULT_FLUSH_ROWS).unwrap();
        assert!(artifact.path.exists());
    }
}
