// WHY: Source documents arrive as plain .txt files scattered under a root
// directory; discovery streams them out with per-file validation so the
// pipeline can start segmenting before the walk finishes.

use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use glob::glob;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for file discovery behavior
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
}

/// A discovered source document and its validation outcome.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl SourceFile {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Discover all `**/*.txt` files recursively under the given root directory.
/// Returns an async stream of validated file paths.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<SourceFile>> {
    let root_path = root_dir.as_ref().to_path_buf();

    futures::stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move { state.next_file().await.map(|result| (result, state)) },
    )
}

/// Internal state for file discovery iteration
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
        }
    }

    async fn next_file(&mut self) -> Option<Result<SourceFile>> {
        if self.glob_iter.is_none() {
            let pattern = format!("{}/**/*.txt", self.root_dir.display());
            debug!("starting file discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => self.glob_iter = Some(paths),
                Err(e) => {
                    return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                }
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next()? {
                Ok(path) => {
                    debug!("found file: {}", path.display());
                    return Some(self.validate_file(path).await);
                }
                Err(e) => {
                    let message = format!("Glob iteration error: {e}");
                    warn!("{}", message);
                    if self.config.fail_fast {
                        return Some(Err(anyhow::anyhow!(message)));
                    }
                    // Non-fatal glob errors skip to the next candidate.
                }
            }
        }
    }

    async fn validate_file(&self, path: PathBuf) -> Result<SourceFile> {
        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(SourceFile { path, error: None }),
            Ok(_) => {
                let error = format!("Path is not a file: {}", path.display());
                warn!("{}", error);
                Ok(SourceFile {
                    path,
                    error: Some(error),
                })
            }
            Err(e) => {
                let error = format!("Cannot access file {}: {}", path.display(), e);
                warn!("{}", error);
                if self.config.fail_fast {
                    Err(anyhow::anyhow!(error))
                } else {
                    Ok(SourceFile {
                        path,
                        error: Some(error),
                    })
                }
            }
        }
    }
}

/// Collect all discovered files into a Vec for easier processing
pub async fn collect_source_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.is_valid()).count();
    let invalid_count = files.len() - valid_count;
    if invalid_count > 0 {
        warn!("found {} files with validation issues", invalid_count);
    }
    info!("file discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Convenience for callers that only want usable paths.
pub async fn find_text_files<P: AsRef<Path>>(root_dir: P) -> Result<Vec<PathBuf>> {
    let files = collect_source_files(root_dir, DiscoveryConfig::default()).await?;
    Ok(files
        .into_iter()
        .filter(|f| f.is_valid())
        .map(|f| f.path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_discover_files_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let files = collect_source_files(temp_dir.path(), DiscoveryConfig::default())
            .await
            .unwrap();
        assert_eq!(files.len(), 0);
    }

    #[tokio::test]
    async fn test_discover_files_matching_pattern() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "story.txt", "Some prose.").await.unwrap();
        create_test_file(temp_dir.path(), "nested/essay.txt", "More prose.").await.unwrap();
        create_test_file(temp_dir.path(), "notes.md", "Should not match").await.unwrap();
        create_test_file(temp_dir.path(), "story.segments.json", "{}").await.unwrap();

        let files = collect_source_files(temp_dir.path(), DiscoveryConfig::default())
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.is_valid()));

        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"story.txt".to_string()));
        assert!(names.contains(&"essay.txt".to_string()));
    }

    #[tokio::test]
    async fn test_unicode_content_is_discovered() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "chinese.txt", "你好。今天天气不错。").await.unwrap();

        let paths = find_text_files(temp_dir.path()).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].to_string_lossy().ends_with("chinese.txt"));
    }

    #[tokio::test]
    async fn test_discovery_succeeds_with_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "fine.txt", "content").await.unwrap();

        let files = collect_source_files(temp_dir.path(), DiscoveryConfig { fail_fast: true })
            .await
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_valid());
    }
}
