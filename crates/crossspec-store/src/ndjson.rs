//! NDJSON claim files
//!
//! One JSON object per `\n`-terminated line. Blank lines are ignored on
//! read; a malformed line fails the read with its 1-based line number.
//! Writes go to a temporary file in the target directory which is then
//! renamed over the destination, so readers never observe a partial file.

use crate::error::StoreError;
use crossspec_domain::Claim;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Parse records from a reader
pub fn parse_records<T, R>(reader: R) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StoreError::io("<reader>", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record =
            serde_json::from_str(&line).map_err(|source| StoreError::Json { line: idx + 1, source })?;
        records.push(record);
    }
    Ok(records)
}

/// Read every record of an NDJSON file
///
/// # Errors
/// [`StoreError::NotFound`] if the file does not exist.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let shown = path.display().to_string();
    if !path.exists() {
        return Err(StoreError::NotFound(format!("claims file {}", shown)));
    }
    let file = std::fs::File::open(path).map_err(|e| StoreError::io(&shown, e))?;
    let records = parse_records(BufReader::new(file))?;
    debug!("Read {} records from {}", records.len(), shown);
    Ok(records)
}

/// Serialize records to an NDJSON string
pub fn to_ndjson<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        let line =
            serde_json::to_string(record).map_err(|source| StoreError::Json { line: idx + 1, source })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Atomically replace `path` with the given records
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let shown = path.display().to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(&shown, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        for (idx, record) in records.iter().enumerate() {
            serde_json::to_writer(&mut writer, record)
                .map_err(|source| StoreError::Json { line: idx + 1, source })?;
            writer.write_all(b"\n").map_err(|e| StoreError::io(&shown, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(&shown, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(&shown, e))?;
    temp.persist(path)
        .map_err(|e| StoreError::io(&shown, e.error))?;

    info!("Wrote {} records to {}", records.len(), shown);
    Ok(())
}

/// Read claims from an NDJSON file
pub fn read_claims(path: &Path) -> Result<Vec<Claim>, StoreError> {
    read_records(path)
}

/// Atomically write claims to an NDJSON file
pub fn write_claims(path: &Path, claims: &[Claim]) -> Result<(), StoreError> {
    write_records(path, claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossspec_domain::{ArtifactType, ExtractedClaim, SourceInfo};

    fn feed_line(text: &str) -> String {
        let claim = ExtractedClaim::new(
            text,
            SourceInfo::new(ArtifactType::Pdf, "docs/brake.pdf"),
            "pdf:text_layer",
        );
        serde_json::to_string(&claim).unwrap()
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let input = format!("{}\n\n   \n{}\n", feed_line("a"), feed_line("b"));
        let records: Vec<ExtractedClaim> = parse_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text_raw, "b");
    }

    #[test]
    fn test_parse_reports_line_number() {
        let input = format!("{}\n\n{{\"text_raw\": 1}}\n", feed_line("a"));
        let err = parse_records::<ExtractedClaim, _>(input.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Json { line: 3, .. }));
    }

    #[test]
    fn test_write_creates_parent_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/feed.jsonl");
        let records = vec![
            ExtractedClaim::new("a", SourceInfo::new(ArtifactType::Pdf, "a.pdf"), "m"),
            ExtractedClaim::new("b", SourceInfo::new(ArtifactType::Pdf, "b.pdf"), "m"),
        ];

        write_records(&path, &records).unwrap();
        let read: Vec<ExtractedClaim> = read_records(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].text_raw, "a");
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = read_records::<ExtractedClaim>(Path::new("/nonexistent/claims.jsonl")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
