//! Single-page comparator.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use pagediff_types::{PageComparisonOutcome, PageDiffError, PageDiffResult, RasterImage};
use tokio::task;

use crate::compositor::{combine_images, combined_width};
use crate::config::CompareConfig;
use crate::mask::{any_mask_for_page, apply_masks_for_page};
use crate::pixelmatch::{DiffOptions, pixelmatch};

/// Compares one baseline/actual page pair.
///
/// Both sources must decode to identical dimensions; a mismatch fails fast
/// before any pixel comparison. Masks targeting this page are applied before
/// diffing, so masked areas never count as differing. A diff image is written
/// to `diff_image_path` only when pixels differ.
pub async fn compare_page_images(
    page: u32,
    baseline_path: &Path,
    actual_path: &Path,
    diff_image_path: &Path,
    config: &CompareConfig,
) -> PageDiffResult<PageComparisonOutcome> {
    let mut baseline = decode_page(page, "baseline", baseline_path).await?;
    let mut actual = decode_page(page, "actual", actual_path).await?;

    if baseline.width() != actual.width() || baseline.height() != actual.height() {
        return Err(PageDiffError::DimensionMismatch {
            page,
            baseline_width: baseline.width(),
            baseline_height: baseline.height(),
            actual_width: actual.width(),
            actual_height: actual.height(),
        });
    }

    let width = baseline.width();
    let height = baseline.height();

    if any_mask_for_page(page, &config.masks) {
        apply_masks_for_page(page, &mut baseline, &mut actual, &config.masks);
    }

    let mut diff = vec![0u8; baseline.data().len()];
    let diff_pixel_count = pixelmatch(
        baseline.data(),
        actual.data(),
        &mut diff,
        width,
        height,
        &DiffOptions {
            threshold: config.threshold,
            include_aa: config.include_aa,
        },
    );

    if diff_pixel_count == 0 {
        return Ok(PageComparisonOutcome {
            page_index: page,
            equal: true,
            diff_pixel_count: 0,
            diff_image_path: None,
        });
    }

    let encoded = if config.combine_images {
        let canvas = combine_images(baseline.data(), actual.data(), &diff, width, height)?;
        encode_png(page, &canvas, combined_width(width), height, ColorType::Rgb8)?
    } else {
        encode_png(page, &diff, width, height, ColorType::Rgba8)?
    };

    let path = diff_image_path.to_path_buf();
    task::spawn_blocking(move || std::fs::write(path, encoded))
        .await
        .map_err(|err| {
            PageDiffError::Io(std::io::Error::other(format!("join error: {err}")))
        })??;

    Ok(PageComparisonOutcome {
        page_index: page,
        equal: false,
        diff_pixel_count,
        diff_image_path: Some(diff_image_path.to_path_buf()),
    })
}

async fn decode_page(page: u32, document: &'static str, path: &Path) -> PageDiffResult<RasterImage> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| PageDiffError::decode(page, document, err.to_string()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| PageDiffError::decode(page, document, err.to_string()))?
        .to_rgba8();
    RasterImage::from_rgba(decoded.width(), decoded.height(), decoded.into_raw())
}

fn encode_png(
    page: u32,
    data: &[u8],
    width: u32,
    height: u32,
    color: ColorType,
) -> PageDiffResult<Vec<u8>> {
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(data, width, height, color)
        .map_err(|err| PageDiffError::encode(page, err.to_string()))?;
    Ok(encoded)
}
