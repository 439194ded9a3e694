//! Visual-regression comparison of PDF documents.
//!
//! Renders a baseline and an actual document page by page with Poppler,
//! diffs the rendered pages pixel-wise through [`pagediff_compare`], and
//! reports which pages differ. The single entry point, [`compare_files`],
//! never returns an error: every failure is folded into the returned verdict.

pub mod cli;

use std::path::PathBuf;

use pagediff_compare::compare_all_pages;
use pagediff_render::{PopplerRenderer, create_result_directories, prefixed};
use pagediff_types::PageDiffResult;

pub use pagediff_compare::CompareConfig;
pub use pagediff_render::{DocumentSource, RenderConfig};
pub use pagediff_types::{ComparisonVerdict, MaskFill, MaskRegion, PageDiffError};

/// Options for one [`compare_files`] run.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Where rendered pages and diff artifacts are written; defaults to
    /// `./pagediff` under the working directory.
    pub result_dir: Option<PathBuf>,
    pub render: RenderConfig,
    pub compare: CompareConfig,
}

/// Verdict plus the error that interrupted the run, when one did.
#[derive(Debug)]
pub struct CompareFilesResult {
    pub verdict: ComparisonVerdict,
    pub error: Option<PageDiffError>,
}

impl CompareFilesResult {
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }
}

/// Renders both documents and compares them page by page.
///
/// This call never fails: any error, from missing inputs to renderer trouble
/// to a mid-batch comparison failure, is captured into the result with
/// `passed = false` and the caller's exclusion set echoed back.
pub async fn compare_files(
    baseline: DocumentSource,
    actual: DocumentSource,
    options: Options,
) -> CompareFilesResult {
    match run_comparison(&baseline, &actual, &options).await {
        Ok(verdict) => CompareFilesResult {
            verdict,
            error: None,
        },
        Err(error) => CompareFilesResult {
            verdict: ComparisonVerdict {
                passed: false,
                message: "Failed to compare the files".to_string(),
                excluded_pages: options.compare.excluded_pages.clone(),
                different_pages: Vec::new(),
            },
            error: Some(error),
        },
    }
}

async fn run_comparison(
    baseline: &DocumentSource,
    actual: &DocumentSource,
    options: &Options,
) -> PageDiffResult<ComparisonVerdict> {
    baseline.validate()?;
    actual.validate()?;

    let renderer = PopplerRenderer::new()?;

    // The two documents are counted and rendered concurrently; page-by-page
    // comparison below is strictly sequential.
    let (baseline_total_pages, actual_total_pages) = tokio::try_join!(
        renderer.page_count(baseline, "baseline"),
        renderer.page_count(actual, "actual"),
    )?;

    let dirs = create_result_directories(options.result_dir.as_deref()).await?;

    let baseline_prefix = prefixed(&dirs.baseline);
    let actual_prefix = prefixed(&dirs.actual);
    tokio::try_join!(
        renderer.render_pages(baseline, &baseline_prefix, &options.render),
        renderer.render_pages(actual, &actual_prefix, &options.render),
    )?;

    compare_all_pages(
        baseline_total_pages,
        actual_total_pages,
        &dirs.baseline,
        &dirs.actual,
        &dirs.difference,
        &options.compare,
    )
    .await
}
