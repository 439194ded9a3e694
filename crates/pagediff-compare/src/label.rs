//! Tiny built-in glyph table for the compositor's panel labels.
//!
//! Each glyph is a 5x7 bitmap (one byte per row, low five bits used) drawn
//! scaled into the RGB canvas. The table only covers the characters of the
//! three panel labels.

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
const SCALE: usize = 2;

/// Horizontal space one character occupies, including tracking.
pub const ADVANCE: usize = (GLYPH_WIDTH + 1) * SCALE;
/// Rendered label height in canvas pixels.
pub const HEIGHT: usize = GLYPH_HEIGHT * SCALE;

pub fn text_width(text: &str) -> usize {
    text.chars().count() * ADVANCE
}

/// Draws `text` in black into an RGB8 canvas at (`left`, `top`). The caller
/// has already verified the text fits inside the canvas.
pub fn draw_text(canvas: &mut [u8], canvas_width: usize, text: &str, left: usize, top: usize) {
    let mut pen_x = left;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if row & (0x10 >> col) == 0 {
                        continue;
                    }
                    let x0 = pen_x + col * SCALE;
                    let y0 = top + row_idx * SCALE;
                    for dy in 0..SCALE {
                        for dx in 0..SCALE {
                            let pos = ((y0 + dy) * canvas_width + x0 + dx) * 3;
                            canvas[pos] = 0;
                            canvas[pos + 1] = 0;
                            canvas[pos + 2] = 0;
                        }
                    }
                }
            }
        }
        pen_x += ADVANCE;
    }
}

fn glyph(ch: char) -> Option<&'static [u8; GLYPH_HEIGHT]> {
    let rows: &[u8; GLYPH_HEIGHT] = match ch {
        'A' => &[0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => &[0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'D' => &[0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'a' => &[0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'c' => &[0x00, 0x00, 0x0E, 0x11, 0x10, 0x11, 0x0E],
        'e' => &[0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'f' => &[0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
        'i' => &[0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'l' => &[0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'n' => &[0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'r' => &[0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => &[0x00, 0x00, 0x0F, 0x10, 0x0E, 0x01, 0x1E],
        't' => &[0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        'u' => &[0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        _ => return None,
    };
    Some(rows)
}
