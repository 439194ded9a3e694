//! Batch orchestrator: iterates the page range common to both documents and
//! aggregates per-page results into a single verdict.

use std::path::Path;

use pagediff_types::{ComparisonVerdict, PageDiffError, PageDiffResult};

use crate::config::CompareConfig;
use crate::page::compare_page_images;

pub const MESSAGE_SAME: &str = "Documents are the same";
pub const MESSAGE_DIFFERENT: &str = "Documents are different";

/// Compares every non-excluded page in `1..=min(baseline, actual)` strictly
/// sequentially, resolving the Nth file of each directory listing as page N.
///
/// The verdict passes only when no page differed and both documents have the
/// same page count; the page-count mismatch message takes precedence over the
/// per-page one, while `different_pages` is still populated. Comparator
/// errors propagate to the caller untouched.
pub async fn compare_all_pages(
    baseline_total_pages: u32,
    actual_total_pages: u32,
    baseline_dir: &Path,
    actual_dir: &Path,
    difference_dir: &Path,
    config: &CompareConfig,
) -> PageDiffResult<ComparisonVerdict> {
    let mut verdict = ComparisonVerdict {
        passed: true,
        message: MESSAGE_SAME.to_string(),
        excluded_pages: config.excluded_pages.clone(),
        different_pages: Vec::new(),
    };

    let pages_to_check = baseline_total_pages.min(actual_total_pages);
    let digits = pages_to_check.to_string().len();

    let baseline_images = list_page_images(baseline_dir).await?;
    let actual_images = list_page_images(actual_dir).await?;

    for page in 1..=pages_to_check {
        if verdict.excluded_pages.contains(&page) {
            continue;
        }

        let index = (page - 1) as usize;
        let (Some(baseline_image), Some(actual_image)) =
            (baseline_images.get(index), actual_images.get(index))
        else {
            return Err(PageDiffError::page_not_found(page));
        };

        let diff_image_name = format!("difference-{page:0digits$}.png");

        let outcome = compare_page_images(
            page,
            &baseline_dir.join(baseline_image),
            &actual_dir.join(actual_image),
            &difference_dir.join(diff_image_name),
            config,
        )
        .await?;

        if !outcome.equal {
            verdict.different_pages.push(page);
        }
    }

    if !verdict.different_pages.is_empty() {
        verdict.passed = false;
        verdict.message = MESSAGE_DIFFERENT.to_string();
    }

    if baseline_total_pages != actual_total_pages {
        verdict.passed = false;
        verdict.message = format!(
            "{MESSAGE_DIFFERENT}: baseline {baseline_total_pages} pages, actual {actual_total_pages} pages"
        );
    }

    Ok(verdict)
}

/// Lists a directory's file names sorted lexically. The renderer zero-pads
/// page numbers, so lexical order is page order.
pub async fn list_page_images(directory: &Path) -> PageDiffResult<Vec<String>> {
    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
