use crate::shared::frame::Frame;

/// Glyph scale: each 5x7 font cell is drawn as SCALE x SCALE pixel blocks.
const SCALE: usize = 3;
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
/// One blank column between glyphs, in font cells.
const ADVANCE: usize = GLYPH_W + 1;
const MARGIN_LEFT: usize = 10;
/// The text baseline sits this many pixels above the bottom edge.
const MARGIN_BOTTOM: usize = 30;

/// Stamps `"<rate> iterations/sec"` in white into the bottom-left corner of
/// the frame, like the familiar on-screen FPS readout.
///
/// Purely cosmetic: mutates pixels only. Skipped entirely when the frame is
/// too small to hold the text, so tiny synthetic frames pass through
/// untouched.
pub fn stamp_rate(frame: &mut Frame, rate: f64) {
    let text = format!("{rate:.0} iterations/sec");
    let text_width = text.chars().count() * ADVANCE * SCALE;
    let text_height = GLYPH_H * SCALE;

    let width = frame.width() as usize;
    let height = frame.height() as usize;
    if MARGIN_LEFT + text_width > width || MARGIN_BOTTOM + text_height > height {
        return;
    }
    let top = height - MARGIN_BOTTOM - text_height;

    let channels = frame.format().channels();
    let data = frame.data_mut();
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = glyph_rows(ch) else {
            continue;
        };
        let left = MARGIN_LEFT + i * ADVANCE * SCALE;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    let y = top + row * SCALE + dy;
                    for dx in 0..SCALE {
                        let x = left + col * SCALE + dx;
                        let at = (y * width + x) * channels;
                        data[at..at + channels].fill(255);
                    }
                }
            }
        }
    }
}

/// 5x7 bitmap rows (bit 4 = leftmost column) for the characters the overlay
/// text can contain: digits, the unit label, and '-' for negative zero
/// artifacts. Unknown characters render as a blank advance.
fn glyph_rows(ch: char) -> Option<[u8; GLYPH_H]> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0F, 0x10, 0x0E, 0x01, 0x1E],
        't' => [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        _ => return None,
    };
    Some(rows)
}
