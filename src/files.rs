// Abbreviation-list file I/O: codec selection by extension, async reads
// and writes, per-file stats for the CLI's reporting.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::encoding::{AbbrevCodec, BinaryCodec, TextCodec};
use crate::entry::AbbrevEntry;

/// File extension for the structured archive format.
pub const ARCHIVE_EXTENSION: &str = "abbrevs";

/// Configuration for batch list loading.
#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    /// Whether to fail fast on the first unreadable or undecodable file, or
    /// continue and report the error in that file's stats.
    pub fail_fast: bool,
}

/// Statistics from loading one abbreviation list file.
#[derive(Debug, Clone, Serialize)]
pub struct ListFileStats {
    pub file_path: String,
    pub entry_count: usize,
    pub variant_count: usize,
    pub load_error: Option<String>,
}

/// Picks the codec for a path by file extension, never by content sniffing:
/// `.abbrevs` is the archive format; `.txt`, `.tsv`, and anything
/// unrecognized decode as the text format, since hand-edited lists are the
/// common case.
pub fn codec_for_path(path: &Path) -> Box<dyn AbbrevCodec> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION) => Box::new(BinaryCodec),
        _ => Box::new(TextCodec),
    }
}

/// Reads one abbreviation list, decoding with the extension-selected codec.
pub async fn read_abbrev_file(path: impl AsRef<Path>) -> Result<Vec<AbbrevEntry>> {
    let path = path.as_ref();
    debug!("reading abbreviation list: {}", path.display());
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let codec = codec_for_path(path);
    let entries = codec.decode(&data).with_context(|| {
        format!(
            "failed to decode {} as {}",
            path.display(),
            codec.identifier()
        )
    })?;
    info!(
        "loaded {}: {} entries, {} bytes",
        path.display(),
        entries.len(),
        data.len()
    );
    Ok(entries)
}

/// Writes one abbreviation list, encoding with the extension-selected codec.
pub async fn write_abbrev_file(path: impl AsRef<Path>, entries: &[AbbrevEntry]) -> Result<()> {
    let path = path.as_ref();
    let codec = codec_for_path(path);
    let data = codec.encode(entries);
    tokio::fs::write(path, &data)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "wrote {}: {} entries, {} bytes as {}",
        path.display(),
        entries.len(),
        data.len(),
        codec.identifier()
    );
    Ok(())
}

/// Loads several lists concurrently, pairing each with its stats.
///
/// Without `fail_fast`, an unreadable file contributes an empty list and an
/// error in its stats so the caller can keep going with the rest.
pub async fn read_abbrev_files(
    paths: &[PathBuf],
    config: &LoadConfig,
) -> Result<Vec<(Vec<AbbrevEntry>, ListFileStats)>> {
    let loads = paths.iter().map(|path| async move {
        let result = read_abbrev_file(path).await;
        (path, result)
    });
    let mut results = Vec::with_capacity(paths.len());
    for (path, result) in futures::future::join_all(loads).await {
        match result {
            Ok(entries) => {
                let stats = ListFileStats {
                    file_path: path.display().to_string(),
                    entry_count: entries.len(),
                    variant_count: entries
                        .iter()
                        .map(|e| e.variants.as_ref().map_or(0, Vec::len))
                        .sum(),
                    load_error: None,
                };
                results.push((entries, stats));
            }
            Err(e) => {
                if config.fail_fast {
                    return Err(e);
                }
                warn!("skipping {}: {e:#}", path.display());
                let stats = ListFileStats {
                    file_path: path.display().to_string(),
                    entry_count: 0,
                    variant_count: 0,
                    load_error: Some(format!("{e:#}")),
                };
                results.push((Vec::new(), stats));
            }
        }
    }
    Ok(results)
}
