//! Result-directory management and input-source validation.

use std::env;
use std::path::{Path, PathBuf};

use pagediff_types::{PageDiffError, PageDiffResult};

/// Directory created under the working directory when the caller does not
/// override the result location.
pub const DEFAULT_RESULT_DIR: &str = "pagediff";

/// A document handed to the renderer, either on disk or in memory.
#[derive(Clone, Debug)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl DocumentSource {
    /// In-memory sources always pass; a path must exist on disk.
    pub fn validate(&self) -> PageDiffResult<()> {
        match self {
            DocumentSource::Bytes(_) => Ok(()),
            DocumentSource::Path(path) => {
                if path.exists() {
                    Ok(())
                } else {
                    Err(PageDiffError::file_not_found(path.clone()))
                }
            }
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::Path(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        DocumentSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

/// Per-run working directories, one image file per page in `baseline` and
/// `actual`, diff artifacts in `difference`.
#[derive(Clone, Debug)]
pub struct ResultDirectories {
    pub baseline: PathBuf,
    pub actual: PathBuf,
    pub difference: PathBuf,
}

/// Creates (and empties) the three result directories under `result_dir`,
/// defaulting to `./pagediff`.
pub async fn create_result_directories(
    result_dir: Option<&Path>,
) -> PageDiffResult<ResultDirectories> {
    let root = match result_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir()?.join(DEFAULT_RESULT_DIR),
    };
    Ok(ResultDirectories {
        baseline: prepare_directory(&root, "baseline").await?,
        actual: prepare_directory(&root, "actual").await?,
        difference: prepare_directory(&root, "difference").await?,
    })
}

async fn prepare_directory(root: &Path, name: &str) -> PageDiffResult<PathBuf> {
    let directory = root.join(name);
    if tokio::fs::metadata(&directory).await.is_ok() {
        tokio::fs::remove_dir_all(&directory).await?;
    }
    tokio::fs::create_dir_all(&directory).await?;
    Ok(directory)
}

/// Joins a directory's basename onto itself, giving the renderer an output
/// prefix that keeps page files grouped by their folder name.
pub fn prefixed(directory: &Path) -> PathBuf {
    match directory.file_name() {
        Some(name) => directory.join(name),
        None => directory.to_path_buf(),
    }
}
