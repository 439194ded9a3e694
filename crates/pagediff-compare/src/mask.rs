//! Rectangle mask applier.
//!
//! Zeroes out caller-specified regions in both the baseline and the actual
//! buffer before comparison, so masked areas can never register as
//! differences. A pixel masked in one image is always masked identically in
//! the other.

use pagediff_types::{MaskRegion, RasterImage};

/// Applies every mask that targets `page` (page number 0 or an exact match),
/// in the order given. Later masks overwrite earlier ones on overlap.
pub fn apply_masks_for_page(
    page: u32,
    baseline: &mut RasterImage,
    actual: &mut RasterImage,
    masks: &[MaskRegion],
) {
    for mask in masks {
        if !mask.applies_to(page) {
            continue;
        }
        apply_rect_mask(baseline, actual, mask);
    }
}

/// Overwrites the clamped rectangle in both buffers: RGB to zero, alpha per
/// the mask fill. Out-of-range or degenerate rectangles silently do nothing.
pub fn apply_rect_mask(baseline: &mut RasterImage, actual: &mut RasterImage, mask: &MaskRegion) {
    let width = baseline.width() as usize;
    let height = baseline.height() as usize;

    let x0 = clamp_coord(mask.x0.floor(), width);
    let y0 = clamp_coord(mask.y0.floor(), height);
    let x1 = clamp_coord(mask.x1.ceil(), width);
    let y1 = clamp_coord(mask.y1.ceil(), height);

    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let alpha = mask.fill.alpha();
    fill_rect(baseline.data_mut(), width, x0, y0, x1, y1, alpha);
    fill_rect(actual.data_mut(), width, x0, y0, x1, y1, alpha);
}

fn clamp_coord(value: f64, limit: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= limit as f64 {
        return limit;
    }
    value as usize
}

fn fill_rect(data: &mut [u8], width: usize, x0: usize, y0: usize, x1: usize, y1: usize, alpha: u8) {
    for y in y0..y1 {
        let start = (y * width + x0) * 4;
        let end = (y * width + x1) * 4;
        for pixel in data[start..end].chunks_exact_mut(4) {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            pixel[3] = alpha;
        }
    }
}

/// True when at least one mask in the set targets `page`.
pub fn any_mask_for_page(page: u32, masks: &[MaskRegion]) -> bool {
    masks.iter().any(|mask| mask.applies_to(page))
}
