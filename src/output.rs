// WHY: The segmentation result is a durable contract: whatever is written next
// to the source file must round-trip sentences and paragraph breaks verbatim,
// because downstream consumers address sentences by index alone.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::segmenter::Segmentation;
use crate::stats::TextStats;

/// Opaque document record stored alongside each segmented source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    /// Caller-supplied creation time, epoch seconds.
    pub created_at: u64,
    #[serde(flatten)]
    pub segmentation: Segmentation,
    pub stats: TextStats,
}

/// Current time as epoch seconds for record metadata.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generate the segments file path for a source file: `<stem>.segments.json`
/// next to the source.
pub fn segments_file_path(source_path: &Path) -> PathBuf {
    let mut segments_path = source_path.to_path_buf();
    let file_stem = segments_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    segments_path.set_file_name(format!("{file_stem}.segments.json"));
    segments_path
}

/// Check whether a source file already has a segments file.
pub fn segments_file_exists<P: AsRef<Path>>(source_path: P) -> bool {
    segments_file_path(source_path.as_ref()).exists()
}

/// Read a previously written document record back from a source's segments file.
pub fn read_document_record<P: AsRef<Path>>(source_path: P) -> Result<DocumentRecord> {
    let segments_path = segments_file_path(source_path.as_ref());
    let content = std::fs::read_to_string(&segments_path)
        .with_context(|| format!("Failed to read {}", segments_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", segments_path.display()))
}

/// Write a document record as the source file's segments file.
/// The whole record is serialized before any bytes are written, so a
/// successfully created file is always complete.
pub async fn write_document_record(
    source_path: &Path,
    record: &DocumentRecord,
) -> Result<PathBuf> {
    let segments_path = segments_file_path(source_path);
    let json = serde_json::to_vec_pretty(record)
        .with_context(|| format!("Failed to serialize record for {}", source_path.display()))?;

    let file = tokio::fs::File::create(&segments_path)
        .await
        .with_context(|| format!("Failed to create {}", segments_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    Ok(segments_path)
}

/// Per-file processing report for the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// File path as given on the command line
    pub path: String,
    /// Number of characters processed
    pub chars_processed: u64,
    /// Number of sentences detected
    pub sentences_detected: u64,
    /// Number of paragraph breaks registered
    pub paragraph_breaks: u64,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Processing status (success, skipped, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

/// Aggregated statistics for a whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub files_processed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub total_sentences: u64,
    pub total_chars: u64,
    pub files: Vec<FileReport>,
}

impl RunStats {
    pub fn record(&mut self, report: FileReport) {
        match report.status.as_str() {
            "success" => {
                self.files_processed += 1;
                self.total_sentences += report.sentences_detected;
                self.total_chars += report.chars_processed;
            }
            "skipped" => self.files_skipped += 1,
            _ => self.files_failed += 1,
        }
        self.files.push(report);
    }
}

/// Write the aggregated run stats to a JSON file.
pub async fn write_run_stats(path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_vec_pretty(stats).context("Failed to serialize run stats")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write run stats to {}", path.display()))?;
    Ok(())
}
