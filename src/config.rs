use std::f64::consts::{PI, TAU};
use std::ops::RangeInclusive;

/// The default grid width, in columns.
pub const DEFAULT_WIDTH: u16 = 120;

/// The default grid height, in rows.
pub const DEFAULT_HEIGHT: u16 = 40;

/// Immutable screen dimensions plus the curve bounds derived from them.
///
/// Every component receives this explicitly; nothing reads dimensions from global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    width: u16,
    height: u16,
}

impl ScreenConfig {
    /// The smallest width that still fits the two-glyph indicator plus one plotted column.
    pub const MIN_WIDTH: u16 = 3;

    /// The largest grid accepted, in cells. Far beyond any real terminal.
    pub const MAX_CELLS: usize = 1 << 20;

    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width < Self::MIN_WIDTH {
            return Err(ConfigError::WidthTooSmall(width));
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        let config = Self { width, height };
        if config.cells() > Self::MAX_CELLS {
            return Err(ConfigError::TooLarge { width, height });
        }
        Ok(config)
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Total number of cells in the grid.
    pub fn cells(&self) -> usize {
        self.width() * self.height()
    }

    /// Bounds use whole rows, so odd heights round down: H=41 gives ±20 and [-20, 61].
    pub fn bounds(&self) -> CurveBounds {
        let height = u32::from(self.height);
        let half = f64::from(height / 2);
        CurveBounds {
            amplitude: -half..=half,
            frequency: 0.0..=PI / 10.0,
            vertical_shift: -half..=f64::from(3 * height / 2),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

/// The closed ranges curve parameters are pinned to after every update.
///
/// Phase has no range here: it wraps modulo [`TAU`] instead of saturating.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveBounds {
    pub amplitude: RangeInclusive<f64>,
    pub frequency: RangeInclusive<f64>,
    pub vertical_shift: RangeInclusive<f64>,
}

impl CurveBounds {
    pub fn clamp_amplitude(&self, value: f64) -> f64 {
        value.clamp(*self.amplitude.start(), *self.amplitude.end())
    }

    pub fn clamp_frequency(&self, value: f64) -> f64 {
        value.clamp(*self.frequency.start(), *self.frequency.end())
    }

    pub fn clamp_vertical_shift(&self, value: f64) -> f64 {
        value.clamp(*self.vertical_shift.start(), *self.vertical_shift.end())
    }

    /// Wrap a phase into `[0, 2π)`.
    pub fn wrap_phase(value: f64) -> f64 {
        let wrapped = value.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if wrapped >= TAU { 0.0 } else { wrapped }
    }
}

/// Errors that can occur when building a [`ScreenConfig`]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("screen width must be at least {min} columns, got {0}", min = ScreenConfig::MIN_WIDTH)]
    WidthTooSmall(u16),

    #[error("screen height must be at least 1 row")]
    ZeroHeight,

    #[error("screen of {width}x{height} exceeds {max} cells", max = ScreenConfig::MAX_CELLS)]
    TooLarge { width: u16, height: u16 },
}
