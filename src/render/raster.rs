use super::buffer::{ScreenBuffer, BLANK};
use crate::curve::CurveParams;

/// Glyph for cells on the curve.
pub const MARKER: char = '#';

/// The two glyphs drawn at the right edge, on the row the curve ended on.
pub const INDICATOR: [char; 2] = ['>', 'O'];

/// Draw one frame of `params` into `buffer`, overwriting every cell.
///
/// Only columns below two thirds of the width are plotted. Each sample is clamped into the
/// grid and drawn three cells wide. Returns the row the indicator was drawn on.
pub fn rasterize(params: &CurveParams, buffer: &mut ScreenBuffer) -> usize {
    buffer.fill(BLANK);

    let width = buffer.width();
    let max_row = buffer.height().saturating_sub(1) as f64;
    let plot_limit = width as f64 / 1.5;

    let mut y = 0.0;
    for x in (0..width).take_while(|x| (*x as f64) < plot_limit) {
        y = params.evaluate(x as f64).clamp(0.0, max_row);
        let row = y.floor() as usize;

        buffer.set(row, x, MARKER);
        if x > 0 {
            buffer.set(row, x - 1, MARKER);
        }
        if x + 1 < width {
            buffer.set(row, x + 1, MARKER);
        }
    }

    let row = y.floor() as usize;
    for (offset, glyph) in INDICATOR.iter().enumerate() {
        buffer.set(row, width - INDICATOR.len() + offset, *glyph);
    }
    row
}
