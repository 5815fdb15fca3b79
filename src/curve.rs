use crate::config::{CurveBounds, ScreenConfig};
use crate::input::{ActiveKeys, LogicalKey};
use std::f64::consts::TAU;
use std::fmt;

/// Radians per second the phase drifts on its own.
///
/// [`LogicalKey::Brake`] subtracts exactly this rate so that holding it freezes the curve.
pub const PHASE_DRIFT_RATE: f64 = 3.0;

/// Radians the simple variant advances the phase by on every frame.
pub const SIMPLE_PHASE_STEP: f64 = 0.1;

const AMPLITUDE_RATE: f64 = 20.0;
const PHASE_RATE: f64 = 3.0;
const FREQUENCY_RATE: f64 = 0.1;
const FAST_PHASE_RATE: f64 = 6.0;
const VERTICAL_SHIFT_RATE: f64 = 20.0;

/// The parameters of `f(x) = amplitude * sin(frequency * x + phase) + vertical_shift`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveParams {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub vertical_shift: f64,
}

impl CurveParams {
    /// A curve spanning the full screen height, four periods across the width.
    pub fn initial(config: &ScreenConfig) -> Self {
        let period = (config.width() / 4) as f64;
        let half_height = (config.height() / 2) as f64;
        Self { amplitude: half_height, frequency: TAU / period, phase: 0.0, vertical_shift: half_height }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.amplitude * (self.frequency * x + self.phase).sin() + self.vertical_shift
    }
}

impl fmt::Display for CurveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Amplitude: {:5.2}, Frequency: {:5.2}, Phase Shift: {:5.2}, Vertical Shift: {:5.2}",
            self.amplitude, self.frequency, self.phase, self.vertical_shift
        )
    }
}

/// The curve field a key drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Amplitude,
    Frequency,
    Phase,
    VerticalShift,
}

/// What holding a key does: a field and its signed rate per second. `None` for quit.
fn key_effect(key: LogicalKey) -> Option<(Field, f64)> {
    use LogicalKey::*;
    let effect = match key {
        IncreaseAmplitude => (Field::Amplitude, AMPLITUDE_RATE),
        DecreaseAmplitude => (Field::Amplitude, -AMPLITUDE_RATE),
        DecreaseFrequency => (Field::Frequency, -FREQUENCY_RATE),
        IncreaseFrequency => (Field::Frequency, FREQUENCY_RATE),
        DecreasePhase => (Field::Phase, -FAST_PHASE_RATE),
        IncreasePhase => (Field::Phase, PHASE_RATE),
        Up => (Field::VerticalShift, -VERTICAL_SHIFT_RATE),
        Down => (Field::VerticalShift, VERTICAL_SHIFT_RATE),
        Brake => (Field::Phase, -PHASE_DRIFT_RATE),
        Quit => return None,
    };
    Some(effect)
}

/// The curve parameters together with the bounds they are held to.
#[derive(Clone, Debug)]
pub struct CurveState {
    params: CurveParams,
    bounds: CurveBounds,
}

impl CurveState {
    /// Start from `params`, normalized into `bounds`.
    pub fn new(params: CurveParams, bounds: CurveBounds) -> Self {
        let mut state = Self { params, bounds };
        state.constrain();
        state
    }

    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    /// Advance by `elapsed` seconds with `keys` held.
    ///
    /// Key deltas are summed first, then the phase drifts, then every field is clamped or
    /// wrapped. Quit has no effect here; the loop handles it before updating.
    pub fn update(&mut self, elapsed: f64, keys: &ActiveKeys) {
        for (field, rate) in keys.iter().filter_map(key_effect) {
            let delta = rate * elapsed;
            match field {
                Field::Amplitude => self.params.amplitude += delta,
                Field::Frequency => self.params.frequency += delta,
                Field::Phase => self.params.phase += delta,
                Field::VerticalShift => self.params.vertical_shift += delta,
            }
        }
        self.params.phase += PHASE_DRIFT_RATE * elapsed;
        self.constrain();
    }

    /// Advance the phase by a fixed step, ignoring time. Used by the simple variant.
    pub fn step_phase(&mut self, step: f64) {
        self.params.phase += step;
        self.constrain();
    }

    fn constrain(&mut self) {
        let params = &mut self.params;
        params.amplitude = self.bounds.clamp_amplitude(params.amplitude);
        params.frequency = self.bounds.clamp_frequency(params.frequency);
        params.phase = CurveBounds::wrap_phase(params.phase);
        params.vertical_shift = self.bounds.clamp_vertical_shift(params.vertical_shift);
    }
}
