use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use pagediff_types::{MaskFill, MaskRegion, RasterImage};

use crate::compositor::{PANEL_GAP, combine_images, combined_width};
use crate::config::CompareConfig;
use crate::mask::{apply_masks_for_page, apply_rect_mask};
use crate::page::compare_page_images;
use crate::pixelmatch::{DiffOptions, pixelmatch};
use crate::{batch, compare_all_pages};

fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    RasterImage::from_rgba(width, height, data).unwrap()
}

fn mask(page_number: u32, fill: MaskFill, x0: f64, y0: f64, x1: f64, y1: f64) -> MaskRegion {
    MaskRegion {
        page_number,
        fill,
        x0,
        y0,
        x1,
        y1,
    }
}

fn diff_count(baseline: &RasterImage, actual: &RasterImage) -> u64 {
    let mut output = vec![0u8; baseline.data().len()];
    pixelmatch(
        baseline.data(),
        actual.data(),
        &mut output,
        baseline.width(),
        baseline.height(),
        &DiffOptions::default(),
    )
}

#[test]
fn identical_images_have_zero_diff_and_gray_output() {
    let image = solid_image(4, 4, [120, 90, 30, 255]);
    let mut output = vec![0u8; image.data().len()];
    let count = pixelmatch(
        image.data(),
        image.data(),
        &mut output,
        4,
        4,
        &DiffOptions::default(),
    );
    assert_eq!(count, 0);
    // Ghost rendering paints every pixel as an opaque gray.
    for pixel in output.chunks_exact(4) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 255);
    }
}

#[test]
fn solid_color_swap_counts_every_pixel() {
    let baseline = solid_image(6, 4, [255, 255, 255, 255]);
    let actual = solid_image(6, 4, [0, 0, 0, 255]);
    assert_eq!(diff_count(&baseline, &actual), 24);
}

#[test]
fn differing_pixels_are_painted_red() {
    let baseline = solid_image(3, 3, [255, 255, 255, 255]);
    let actual = solid_image(3, 3, [0, 0, 0, 255]);
    let mut output = vec![0u8; baseline.data().len()];
    pixelmatch(
        baseline.data(),
        actual.data(),
        &mut output,
        3,
        3,
        &DiffOptions::default(),
    );
    assert_eq!(&output[..4], &[255, 0, 0, 255]);
}

#[test]
fn threshold_tolerates_small_channel_noise() {
    let baseline = solid_image(4, 4, [100, 100, 100, 255]);
    let mut actual = baseline.clone();
    actual.data_mut()[0] = 103;
    actual.data_mut()[1] = 98;
    assert_eq!(diff_count(&baseline, &actual), 0);

    let mut output = vec![0u8; baseline.data().len()];
    let strict = pixelmatch(
        baseline.data(),
        actual.data(),
        &mut output,
        4,
        4,
        &DiffOptions {
            threshold: 0.0,
            include_aa: true,
        },
    );
    assert_eq!(strict, 1);
}

#[test]
fn mask_zeroes_rgb_and_sets_alpha_in_both_images() {
    let mut baseline = solid_image(4, 4, [200, 100, 50, 255]);
    let mut actual = solid_image(4, 4, [10, 20, 30, 255]);
    apply_rect_mask(
        &mut baseline,
        &mut actual,
        &mask(0, MaskFill::Transparent, 1.0, 1.0, 3.0, 3.0),
    );
    for image in [&baseline, &actual] {
        let pos = (1 * 4 + 1) * 4;
        assert_eq!(&image.data()[pos..pos + 4], &[0, 0, 0, 0]);
    }
    // Pixels outside the rectangle are untouched.
    assert_eq!(&baseline.data()[..4], &[200, 100, 50, 255]);
    assert_eq!(&actual.data()[..4], &[10, 20, 30, 255]);
}

#[test]
fn masked_difference_compares_equal_for_either_fill() {
    for fill in [MaskFill::Black, MaskFill::Transparent] {
        let baseline = solid_image(8, 8, [255, 255, 255, 255]);
        let mut actual = baseline.clone();
        // Corrupt a block strictly inside the mask rectangle.
        for y in 2..5 {
            for x in 2..5 {
                let pos = (y * 8 + x) * 4;
                actual.data_mut()[pos] = 0;
                actual.data_mut()[pos + 1] = 0;
            }
        }
        let mut baseline = baseline;
        let region = mask(0, fill, 1.0, 1.0, 6.0, 6.0);
        apply_masks_for_page(1, &mut baseline, &mut actual, std::slice::from_ref(&region));
        assert_eq!(diff_count(&baseline, &actual), 0, "fill {fill:?}");
    }
}

#[test]
fn inverted_or_out_of_range_rectangles_are_no_ops() {
    let original = solid_image(4, 4, [7, 8, 9, 255]);
    let mut baseline = original.clone();
    let mut actual = original.clone();
    for region in [
        mask(0, MaskFill::Black, 3.0, 3.0, 1.0, 1.0),
        mask(0, MaskFill::Black, 100.0, 100.0, 200.0, 200.0),
        mask(0, MaskFill::Black, -50.0, -50.0, -10.0, -10.0),
        mask(0, MaskFill::Black, 2.0, 2.0, 2.0, 2.0),
    ] {
        apply_rect_mask(&mut baseline, &mut actual, &region);
    }
    assert_eq!(baseline.data(), original.data());
    assert_eq!(actual.data(), original.data());
}

#[test]
fn unbounded_rectangle_clamps_to_the_full_image() {
    let mut baseline = solid_image(4, 4, [1, 2, 3, 255]);
    let mut actual = solid_image(4, 4, [9, 9, 9, 255]);
    apply_rect_mask(
        &mut baseline,
        &mut actual,
        &mask(0, MaskFill::Black, -1e9, -1e9, 1e9, 1e9),
    );
    for pixel in baseline.data().chunks_exact(4) {
        assert_eq!(pixel, &[0, 0, 0, 255]);
    }
    assert_eq!(baseline.data(), actual.data());
}

#[test]
fn fractional_coordinates_floor_and_ceil() {
    let mut baseline = solid_image(4, 1, [9, 9, 9, 255]);
    let mut actual = baseline.clone();
    apply_rect_mask(
        &mut baseline,
        &mut actual,
        &mask(0, MaskFill::Black, 1.7, 0.0, 2.2, 1.0),
    );
    // x0 floors to 1, x1 ceils to 3.
    assert_eq!(&baseline.data()[..4], &[9, 9, 9, 255]);
    assert_eq!(&baseline.data()[4..8], &[0, 0, 0, 255]);
    assert_eq!(&baseline.data()[8..12], &[0, 0, 0, 255]);
    assert_eq!(&baseline.data()[12..16], &[9, 9, 9, 255]);
}

#[test]
fn masks_apply_in_order_with_last_write_wins() {
    let mut baseline = solid_image(2, 1, [5, 5, 5, 255]);
    let mut actual = baseline.clone();
    let masks = [
        mask(0, MaskFill::Black, 0.0, 0.0, 2.0, 1.0),
        mask(0, MaskFill::Transparent, 1.0, 0.0, 2.0, 1.0),
    ];
    apply_masks_for_page(1, &mut baseline, &mut actual, &masks);
    assert_eq!(&baseline.data()[..4], &[0, 0, 0, 255]);
    assert_eq!(&baseline.data()[4..8], &[0, 0, 0, 0]);
}

#[test]
fn masks_scoped_to_other_pages_are_skipped() {
    let original = solid_image(2, 2, [4, 4, 4, 255]);
    let mut baseline = original.clone();
    let mut actual = original.clone();
    let region = mask(3, MaskFill::Black, 0.0, 0.0, 2.0, 2.0);
    apply_masks_for_page(2, &mut baseline, &mut actual, std::slice::from_ref(&region));
    assert_eq!(baseline.data(), original.data());
}

#[test]
fn combined_canvas_has_three_panels_and_a_fixed_gap() {
    let width = 200u32;
    let height = 40u32;
    let baseline = solid_image(width, height, [255, 0, 0, 255]);
    let actual = solid_image(width, height, [0, 255, 0, 255]);
    let diff = solid_image(width, height, [0, 0, 255, 255]);
    let canvas = combine_images(
        baseline.data(),
        actual.data(),
        diff.data(),
        width,
        height,
    )
    .unwrap();
    let canvas_width = combined_width(width) as usize;
    assert_eq!(canvas_width as u32, width * 3 + PANEL_GAP * 2);
    assert_eq!(canvas.len(), canvas_width * height as usize * 3);

    // Bottom row is clear of labels: panels separated by black gaps.
    let row = (height as usize - 1) * canvas_width * 3;
    assert_eq!(&canvas[row..row + 3], &[255, 0, 0]);
    let gap = row + (width as usize) * 3;
    assert_eq!(&canvas[gap..gap + 3], &[0, 0, 0]);
    let second = row + (width as usize + PANEL_GAP as usize) * 3;
    assert_eq!(&canvas[second..second + 3], &[0, 255, 0]);
}

#[test]
fn composition_fails_for_pages_narrower_than_the_label_inset() {
    let width = 64u32;
    let height = 64u32;
    let panel = solid_image(width, height, [1, 1, 1, 255]);
    let err = combine_images(panel.data(), panel.data(), panel.data(), width, height).unwrap_err();
    assert!(matches!(
        err,
        pagediff_types::PageDiffError::CompositionFailure
    ));
}

fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let image = solid_image(width, height, rgba);
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(image.data(), width, height, ColorType::Rgba8)
        .unwrap();
    std::fs::write(path, encoded).unwrap();
}

fn page_dirs(root: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let baseline = root.join("baseline");
    let actual = root.join("actual");
    let difference = root.join("difference");
    for dir in [&baseline, &actual, &difference] {
        std::fs::create_dir_all(dir).unwrap();
    }
    (baseline, actual, difference)
}

#[tokio::test(flavor = "multi_thread")]
async fn equal_pages_write_no_diff_file() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = dir.path().join("baseline.png");
    let actual = dir.path().join("actual.png");
    let diff = dir.path().join("diff.png");
    write_png(&baseline, 8, 8, [50, 60, 70, 255]);
    write_png(&actual, 8, 8, [50, 60, 70, 255]);

    let outcome = compare_page_images(1, &baseline, &actual, &diff, &CompareConfig::default())
        .await
        .unwrap();
    assert!(outcome.equal);
    assert_eq!(outcome.diff_pixel_count, 0);
    assert!(outcome.diff_image_path.is_none());
    assert!(!diff.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn differing_pages_write_a_diff_file() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = dir.path().join("baseline.png");
    let actual = dir.path().join("actual.png");
    let diff = dir.path().join("diff.png");
    write_png(&baseline, 8, 8, [255, 255, 255, 255]);
    write_png(&actual, 8, 8, [0, 0, 0, 255]);

    let outcome = compare_page_images(1, &baseline, &actual, &diff, &CompareConfig::default())
        .await
        .unwrap();
    assert!(!outcome.equal);
    assert_eq!(outcome.diff_pixel_count, 64);
    assert_eq!(outcome.diff_image_path.as_deref(), Some(diff.as_path()));
    let written = image::open(&diff).unwrap();
    assert_eq!((written.width(), written.height()), (8, 8));
}

#[tokio::test(flavor = "multi_thread")]
async fn dimension_mismatch_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = dir.path().join("baseline.png");
    let actual = dir.path().join("actual.png");
    write_png(&baseline, 8, 8, [0, 0, 0, 255]);
    write_png(&actual, 8, 4, [0, 0, 0, 255]);

    let err = compare_page_images(
        2,
        &baseline,
        &actual,
        &dir.path().join("diff.png"),
        &CompareConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        pagediff_types::PageDiffError::DimensionMismatch { page: 2, .. }
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn masked_page_difference_compares_equal() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = dir.path().join("baseline.png");
    let actual = dir.path().join("actual.png");
    let diff = dir.path().join("diff.png");
    write_png(&baseline, 8, 8, [255, 255, 255, 255]);
    write_png(&actual, 8, 8, [0, 0, 0, 255]);

    let config = CompareConfig {
        masks: vec![mask(0, MaskFill::Black, 0.0, 0.0, 8.0, 8.0)],
        ..CompareConfig::default()
    };
    let outcome = compare_page_images(1, &baseline, &actual, &diff, &config)
        .await
        .unwrap();
    assert!(outcome.equal);
    assert!(!diff.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn composite_mode_writes_the_three_panel_image() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = dir.path().join("baseline.png");
    let actual = dir.path().join("actual.png");
    let diff = dir.path().join("diff.png");
    let (width, height) = (150u32, 60u32);
    write_png(&baseline, width, height, [255, 255, 255, 255]);
    write_png(&actual, width, height, [0, 0, 0, 255]);

    let config = CompareConfig {
        combine_images: true,
        ..CompareConfig::default()
    };
    let outcome = compare_page_images(1, &baseline, &actual, &diff, &config)
        .await
        .unwrap();
    assert!(!outcome.equal);
    let written = image::open(&diff).unwrap();
    assert_eq!(written.width(), width * 3 + 2 * PANEL_GAP);
    assert_eq!(written.height(), height);
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_reports_the_differing_page_in_ascending_order() {
    let dir = tempfile::tempdir().unwrap();
    let (baseline_dir, actual_dir, difference_dir) = page_dirs(dir.path());
    for page in 1..=5u32 {
        let rgba = if page == 3 {
            [255, 255, 255, 255]
        } else {
            [40, 40, 40, 255]
        };
        write_png(&baseline_dir.join(format!("page-{page}.png")), 8, 8, [40, 40, 40, 255]);
        write_png(&actual_dir.join(format!("page-{page}.png")), 8, 8, rgba);
    }

    let verdict = compare_all_pages(
        5,
        5,
        &baseline_dir,
        &actual_dir,
        &difference_dir,
        &CompareConfig::default(),
    )
    .await
    .unwrap();
    assert!(!verdict.passed);
    assert_eq!(verdict.message, batch::MESSAGE_DIFFERENT);
    assert_eq!(verdict.different_pages, vec![3]);
    assert!(verdict.excluded_pages.is_empty());
    assert!(difference_dir.join("difference-3.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn excluding_the_differing_page_passes() {
    let dir = tempfile::tempdir().unwrap();
    let (baseline_dir, actual_dir, difference_dir) = page_dirs(dir.path());
    for page in 1..=5u32 {
        let rgba = if page == 3 {
            [255, 255, 255, 255]
        } else {
            [40, 40, 40, 255]
        };
        write_png(&baseline_dir.join(format!("page-{page}.png")), 8, 8, [40, 40, 40, 255]);
        write_png(&actual_dir.join(format!("page-{page}.png")), 8, 8, rgba);
    }

    let config = CompareConfig {
        excluded_pages: vec![3],
        ..CompareConfig::default()
    };
    let verdict = compare_all_pages(5, 5, &baseline_dir, &actual_dir, &difference_dir, &config)
        .await
        .unwrap();
    assert!(verdict.passed);
    assert_eq!(verdict.message, batch::MESSAGE_SAME);
    assert!(verdict.different_pages.is_empty());
    assert_eq!(verdict.excluded_pages, vec![3]);
}

#[tokio::test(flavor = "multi_thread")]
async fn page_count_mismatch_fails_even_when_common_pages_match() {
    let dir = tempfile::tempdir().unwrap();
    let (baseline_dir, actual_dir, difference_dir) = page_dirs(dir.path());
    for page in 1..=5u32 {
        write_png(&baseline_dir.join(format!("page-{page}.png")), 8, 8, [7, 7, 7, 255]);
    }
    for page in 1..=4u32 {
        write_png(&actual_dir.join(format!("page-{page}.png")), 8, 8, [7, 7, 7, 255]);
    }

    let verdict = compare_all_pages(
        5,
        4,
        &baseline_dir,
        &actual_dir,
        &difference_dir,
        &CompareConfig::default(),
    )
    .await
    .unwrap();
    assert!(!verdict.passed);
    assert!(verdict.different_pages.is_empty());
    assert_eq!(
        verdict.message,
        "Documents are different: baseline 5 pages, actual 4 pages"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn diff_filenames_are_zero_padded_to_the_page_count_width() {
    let dir = tempfile::tempdir().unwrap();
    let (baseline_dir, actual_dir, difference_dir) = page_dirs(dir.path());
    for page in 1..=10u32 {
        write_png(
            &baseline_dir.join(format!("page-{page:02}.png")),
            8,
            8,
            [0, 0, 0, 255],
        );
        write_png(
            &actual_dir.join(format!("page-{page:02}.png")),
            8,
            8,
            [255, 255, 255, 255],
        );
    }

    let verdict = compare_all_pages(
        10,
        10,
        &baseline_dir,
        &actual_dir,
        &difference_dir,
        &CompareConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(verdict.different_pages, (1..=10).collect::<Vec<_>>());
    assert!(difference_dir.join("difference-01.png").exists());
    assert!(difference_dir.join("difference-10.png").exists());
    assert!(!difference_dir.join("difference-1.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn short_directory_listing_is_a_page_not_found_error() {
    let dir = tempfile::tempdir().unwrap();
    let (baseline_dir, actual_dir, difference_dir) = page_dirs(dir.path());
    write_png(&baseline_dir.join("page-1.png"), 8, 8, [0, 0, 0, 255]);
    write_png(&baseline_dir.join("page-2.png"), 8, 8, [0, 0, 0, 255]);
    write_png(&actual_dir.join("page-1.png"), 8, 8, [0, 0, 0, 255]);

    let err = compare_all_pages(
        2,
        2,
        &baseline_dir,
        &actual_dir,
        &difference_dir,
        &CompareConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        pagediff_types::PageDiffError::PageNotFound { page: 2 }
    ));
}
