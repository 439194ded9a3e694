//! Pixel-level difference function.
//!
//! Port of the pixelmatch algorithm: pixels are compared by YIQ color
//! distance against a squared threshold, anti-aliased edge pixels are
//! detected with the neighbour heuristic and skipped unless requested, and
//! the output buffer is painted for human review (red for differences,
//! yellow for skipped anti-aliasing, a faded gray ghost of the baseline
//! elsewhere).

use crate::config::{DEFAULT_INCLUDE_AA, DEFAULT_THRESHOLD};

/// Maximum possible YIQ delta between two opaque pixels; the threshold is a
/// fraction of this.
const MAX_YIQ_DELTA: f64 = 35215.0;

const DIFF_COLOR: [u8; 3] = [255, 0, 0];
const AA_COLOR: [u8; 3] = [255, 255, 0];
const GHOST_ALPHA: f64 = 0.1;

#[derive(Clone, Copy, Debug)]
pub struct DiffOptions {
    pub threshold: f64,
    pub include_aa: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            include_aa: DEFAULT_INCLUDE_AA,
        }
    }
}

/// Compares two equal-sized RGBA buffers and returns the number of differing
/// pixels, painting a visualization into `output`.
///
/// Callers guarantee all three buffers are `width * height * 4` bytes; the
/// page comparator enforces this before delegating here.
pub fn pixelmatch(
    img1: &[u8],
    img2: &[u8],
    output: &mut [u8],
    width: u32,
    height: u32,
    options: &DiffOptions,
) -> u64 {
    let len = width as usize * height as usize * 4;
    debug_assert_eq!(img1.len(), len);
    debug_assert_eq!(img2.len(), len);
    debug_assert_eq!(output.len(), len);

    if img1 == img2 {
        for pos in (0..len).step_by(4) {
            draw_gray_pixel(img1, pos, output);
        }
        return 0;
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;
    let mut diff_count = 0u64;

    for y in 0..height {
        for x in 0..width {
            let pos = ((y * width + x) * 4) as usize;
            let delta = color_delta(img1, img2, pos, pos, false);

            if delta.abs() > max_delta {
                let aa = !options.include_aa
                    && (antialiased(img1, x, y, width, height, img2)
                        || antialiased(img2, x, y, width, height, img1));
                if aa {
                    draw_pixel(output, pos, AA_COLOR);
                } else {
                    draw_pixel(output, pos, DIFF_COLOR);
                    diff_count += 1;
                }
            } else {
                draw_gray_pixel(img1, pos, output);
            }
        }
    }

    diff_count
}

fn draw_pixel(output: &mut [u8], pos: usize, rgb: [u8; 3]) {
    output[pos] = rgb[0];
    output[pos + 1] = rgb[1];
    output[pos + 2] = rgb[2];
    output[pos + 3] = 255;
}

fn draw_gray_pixel(img: &[u8], pos: usize, output: &mut [u8]) {
    let luma = rgb2y(img[pos] as f64, img[pos + 1] as f64, img[pos + 2] as f64);
    let value = blend(luma, GHOST_ALPHA * img[pos + 3] as f64 / 255.0) as u8;
    draw_pixel(output, pos, [value, value, value]);
}

/// Blends `color` onto a white background with the given opacity.
fn blend(color: f64, alpha: f64) -> f64 {
    255.0 + (color - 255.0) * alpha
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

/// Squared YIQ distance between the pixels at `pos1` in `img1` and `pos2` in
/// `img2`, negative when the first pixel is the lighter one. With `y_only`,
/// just the brightness delta.
fn color_delta(img1: &[u8], img2: &[u8], pos1: usize, pos2: usize, y_only: bool) -> f64 {
    let (mut r1, mut g1, mut b1, a1) = (
        img1[pos1] as f64,
        img1[pos1 + 1] as f64,
        img1[pos1 + 2] as f64,
        img1[pos1 + 3] as f64,
    );
    let (mut r2, mut g2, mut b2, a2) = (
        img2[pos2] as f64,
        img2[pos2 + 1] as f64,
        img2[pos2 + 2] as f64,
        img2[pos2 + 3] as f64,
    );

    if a1 == a2 && r1 == r2 && g1 == g2 && b1 == b2 {
        return 0.0;
    }

    if a1 < 255.0 {
        let a1 = a1 / 255.0;
        r1 = blend(r1, a1);
        g1 = blend(g1, a1);
        b1 = blend(b1, a1);
    }
    if a2 < 255.0 {
        let a2 = a2 / 255.0;
        r2 = blend(r2, a2);
        g2 = blend(g2, a2);
        b2 = blend(b2, a2);
    }

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;
    if y1 > y2 { -delta } else { delta }
}

/// Heuristic from the pixelmatch paper: a pixel is likely anti-aliasing when
/// it has no more than two equal neighbours and both its darkest and
/// brightest neighbours sit on wider same-colored runs in both images.
fn antialiased(img: &[u8], x1: u32, y1: u32, width: u32, height: u32, img2: &[u8]) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = ((y1 * width + x1) * 4) as usize;

    let mut zeroes = u32::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0u32, 0u32, 0u32, 0u32);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let delta = color_delta(img, img, pos, ((y * width + x) * 4) as usize, true);
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_x = x;
                min_y = y;
            } else if delta > max {
                max = delta;
                max_x = x;
                max_y = y;
            }
        }
    }

    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_x, min_y, width, height)
        && has_many_siblings(img2, min_x, min_y, width, height))
        || (has_many_siblings(img, max_x, max_y, width, height)
            && has_many_siblings(img2, max_x, max_y, width, height))
}

/// True when the pixel has three or more identically-colored neighbours.
fn has_many_siblings(img: &[u8], x1: u32, y1: u32, width: u32, height: u32) -> bool {
    let x0 = x1.saturating_sub(1);
    let y0 = y1.saturating_sub(1);
    let x2 = (x1 + 1).min(width - 1);
    let y2 = (y1 + 1).min(height - 1);
    let pos = ((y1 * width + x1) * 4) as usize;

    let mut zeroes = u32::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let pos2 = ((y * width + x) * 4) as usize;
            if img[pos..pos + 4] == img[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }

    false
}
