mod buffer;
mod presenter;
mod raster;

pub use buffer::{ScreenBuffer, BLANK, TERMINATOR};
pub use presenter::{Frame, PresentError, Presenter, TerminalSession};
pub use raster::{rasterize, INDICATOR, MARKER};

#[cfg(test)]
pub(crate) use presenter::tests::RecordingPresenter;

use crate::curve::CurveParams;

/// Fill `buffer` with a complete frame for `params`.
///
/// The curve is drawn first, then the readout (if requested) is overlaid on the top row,
/// and finally the last cell is set to the terminator. Returns the readout text.
pub fn draw_frame(params: &CurveParams, buffer: &mut ScreenBuffer, with_info: bool) -> Option<String> {
    rasterize(params, buffer);
    let info = with_info.then(|| params.to_string());
    if let Some(info) = &info {
        buffer.write_line(0, info);
    }
    buffer.terminate();
    info
}
