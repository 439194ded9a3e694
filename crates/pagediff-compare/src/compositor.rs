//! Three-panel diff compositor.
//!
//! Builds one labeled baseline | actual | difference image for manual review.

use pagediff_types::{PageDiffError, PageDiffResult};

use crate::label;

/// Horizontal gap between panels, in pixels.
pub const PANEL_GAP: u32 = 10;
/// Labels anchor this far left of their panel's right edge.
const LABEL_INSET: u32 = 130;
const LABEL_TOP: u32 = 10;

const PANEL_LABELS: [&str; 3] = ["Baseline", "Actual", "Difference"];

/// Combined canvas width for a given per-page width.
pub fn combined_width(page_width: u32) -> u32 {
    page_width * 3 + PANEL_GAP * 2
}

/// Composites the three RGBA page buffers left-to-right onto a black RGB8
/// canvas of `combined_width(width) x height` and overlays the panel labels.
///
/// Fails as a single composition error when a label would fall outside the
/// canvas (pages narrower than the label inset or shorter than the label
/// block); no partial output is produced.
pub fn combine_images(
    baseline: &[u8],
    actual: &[u8],
    diff: &[u8],
    width: u32,
    height: u32,
) -> PageDiffResult<Vec<u8>> {
    let canvas_width = combined_width(width) as usize;
    let canvas_height = height as usize;
    let mut canvas = vec![0u8; canvas_width * canvas_height * 3];

    for (panel, buffer) in [baseline, actual, diff].into_iter().enumerate() {
        let left = panel as u32 * (width + PANEL_GAP);
        blit_rgba_over_black(&mut canvas, canvas_width, buffer, width, height, left);
    }

    for (panel, text) in PANEL_LABELS.iter().enumerate() {
        // The first label anchors off the bare panel width; the later ones
        // include the gap in their offset.
        let anchor = if panel == 0 {
            width
        } else {
            (panel as u32 + 1) * (width + PANEL_GAP)
        };
        let Some(left) = anchor.checked_sub(LABEL_INSET) else {
            return Err(PageDiffError::CompositionFailure);
        };
        let left = left as usize;
        if left + label::text_width(text) > canvas_width
            || LABEL_TOP as usize + label::HEIGHT > canvas_height
        {
            return Err(PageDiffError::CompositionFailure);
        }
        label::draw_text(&mut canvas, canvas_width, text, left, LABEL_TOP as usize);
    }

    Ok(canvas)
}

fn blit_rgba_over_black(
    canvas: &mut [u8],
    canvas_width: usize,
    panel: &[u8],
    width: u32,
    height: u32,
    left: u32,
) {
    let width = width as usize;
    for y in 0..height as usize {
        let src_row = &panel[y * width * 4..(y + 1) * width * 4];
        let dst_start = (y * canvas_width + left as usize) * 3;
        let dst_row = &mut canvas[dst_start..dst_start + width * 3];
        for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(3)) {
            let alpha = src[3] as u16;
            dst[0] = ((src[0] as u16 * alpha) / 255) as u8;
            dst[1] = ((src[1] as u16 * alpha) / 255) as u8;
            dst[2] = ((src[2] as u16 * alpha) / 255) as u8;
        }
    }
}
