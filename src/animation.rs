use crate::clock::FrameClock;
use crate::config::ScreenConfig;
use crate::curve::{CurveParams, CurveState, SIMPLE_PHASE_STEP};
use crate::input::{sample, ActiveKeys, InputError, InputSource};
use crate::render::{draw_frame, Frame, PresentError, Presenter, ScreenBuffer};
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Fixed pause between frames in the simple variant, roughly 60 frames per second.
const SIMPLE_FRAME_DELAY: Duration = Duration::from_millis(16);

/// Which flavour of the animation to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Constant phase step per frame at a capped frame rate; only the quit key is read
    Simple,
    /// Time-scaled motion with keyboard control and an on-screen readout
    #[default]
    Interactive,
}

/// Per-variant frame policy
pub(crate) trait Driver {
    /// Move the curve forward by one frame.
    fn advance(&self, state: &mut CurveState, elapsed: f64, keys: &ActiveKeys);

    /// Pause after presenting each frame, if any.
    fn frame_delay(&self) -> Option<Duration> {
        None
    }

    /// Whether frames carry the parameter readout.
    fn shows_info(&self) -> bool;
}

/// Simple variant: ignores time and keys, steps the phase by a constant
struct Simple;

impl Driver for Simple {
    fn advance(&self, state: &mut CurveState, _elapsed: f64, _keys: &ActiveKeys) {
        state.step_phase(SIMPLE_PHASE_STEP);
    }

    fn frame_delay(&self) -> Option<Duration> {
        Some(SIMPLE_FRAME_DELAY)
    }

    fn shows_info(&self) -> bool {
        false
    }
}

/// Interactive variant: elapsed-time scaling plus keyboard control
struct Interactive;

impl Driver for Interactive {
    fn advance(&self, state: &mut CurveState, elapsed: f64, keys: &ActiveKeys) {
        state.update(elapsed, keys);
    }

    fn shows_info(&self) -> bool {
        true
    }
}

/// Get the driver implementation for a given mode
pub(crate) fn get_driver(mode: Mode) -> Box<dyn Driver> {
    match mode {
        Mode::Simple => Box::new(Simple),
        Mode::Interactive => Box::new(Interactive),
    }
}

/// Errors that can stop the animation loop
#[derive(thiserror::Error, Debug)]
pub enum AnimationError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Present(#[from] PresentError),
}

/// The animation loop and everything it owns across frames.
pub struct SineAnimation {
    state: CurveState,
    buffer: ScreenBuffer,
    clock: FrameClock,
    driver: Box<dyn Driver>,
    frames: u64,
}

impl SineAnimation {
    pub fn new(config: &ScreenConfig, mode: Mode) -> Self {
        Self {
            state: CurveState::new(CurveParams::initial(config), config.bounds()),
            buffer: ScreenBuffer::new(config),
            clock: FrameClock::new(),
            driver: get_driver(mode),
            frames: 0,
        }
    }

    pub fn params(&self) -> &CurveParams {
        self.state.params()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run a single frame: measure time, sample input, update, draw, present.
    ///
    /// Breaks without touching the buffer if quit is held.
    pub fn step<I, P>(&mut self, input: &mut I, presenter: &mut P) -> Result<ControlFlow<()>, AnimationError>
    where
        I: InputSource + ?Sized,
        P: Presenter + ?Sized,
    {
        let elapsed = self.clock.tick();
        let keys = sample(input)?;
        if keys.quit_requested() {
            return Ok(ControlFlow::Break(()));
        }

        self.driver.advance(&mut self.state, elapsed, &keys);
        let info = draw_frame(self.state.params(), &mut self.buffer, self.driver.shows_info());
        presenter.present(&Frame { buffer: &self.buffer, info: info.as_deref() })?;
        self.frames += 1;
        Ok(ControlFlow::Continue(()))
    }

    /// Step until quit is requested or an error occurs. Returns the number of presented frames.
    pub fn run<I, P>(&mut self, input: &mut I, presenter: &mut P) -> Result<u64, AnimationError>
    where
        I: InputSource + ?Sized,
        P: Presenter + ?Sized,
    {
        debug!("animation loop started");
        while self.step(input, presenter)?.is_continue() {
            if let Some(delay) = self.driver.frame_delay() {
                thread::sleep(delay);
            }
        }
        info!(frames = self.frames, "quit requested");
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{LogicalKey, NoInput, ScriptedInput};
    use crate::render::{RecordingPresenter, MARKER, TERMINATOR};
    use rstest::rstest;
    use std::f64::consts::TAU;

    fn animation(mode: Mode) -> SineAnimation {
        SineAnimation::new(&ScreenConfig::default(), mode)
    }

    #[rstest]
    #[case(Mode::Simple)]
    #[case(Mode::Interactive)]
    fn quit_stops_before_drawing(#[case] mode: Mode) {
        let mut animation = animation(mode);
        let mut input = ScriptedInput::new([vec![], vec![LogicalKey::Up], vec![LogicalKey::Quit], vec![]]);
        let mut presenter = RecordingPresenter::default();

        let frames = animation.run(&mut input, &mut presenter).expect("run failed");
        assert_eq!(frames, 2);
        assert_eq!(presenter.frames.len(), 2);
        assert_eq!(input.polls(), 3);
    }

    #[test]
    fn quit_on_first_frame_draws_nothing() {
        let mut animation = animation(Mode::Interactive);
        let mut input = ScriptedInput::new([vec![LogicalKey::Quit, LogicalKey::Down]]);
        let mut presenter = RecordingPresenter::default();

        let flow = animation.step(&mut input, &mut presenter).expect("step failed");
        assert!(flow.is_break());
        assert!(presenter.frames.is_empty());
        assert_eq!(*animation.params(), CurveParams::initial(&ScreenConfig::default()));
    }

    #[test]
    fn interactive_first_frame() {
        let mut animation = animation(Mode::Interactive);
        let mut presenter = RecordingPresenter::default();
        animation.step(&mut NoInput, &mut presenter).expect("step failed");

        // the first frame measures no elapsed time, so the curve is still at its initial phase
        assert_eq!(animation.params().phase, 0.0);
        let (buffer, info) = &presenter.frames[0];
        assert_eq!(buffer.get(20, 0), Some(MARKER));
        assert_eq!(buffer.get(39, 119), Some(TERMINATOR));
        assert_eq!(
            info.as_deref(),
            Some("Amplitude: 20.00, Frequency:  0.21, Phase Shift:  0.00, Vertical Shift: 20.00")
        );
    }

    #[test]
    fn simple_steps_phase_per_frame() {
        let mut animation = animation(Mode::Simple);
        let mut presenter = RecordingPresenter::default();
        for _ in 0..3 {
            animation.step(&mut NoInput, &mut presenter).expect("step failed");
        }
        assert!((animation.params().phase - 3.0 * SIMPLE_PHASE_STEP).abs() < 1e-9);
        assert!(presenter.frames.iter().all(|(_, info)| info.is_none()));
        assert_eq!(animation.frames(), 3);
    }

    #[test]
    fn simple_ignores_keys() {
        let mut animation = animation(Mode::Simple);
        let mut input = ScriptedInput::new([vec![LogicalKey::IncreaseAmplitude, LogicalKey::Brake]]);
        let mut presenter = RecordingPresenter::default();
        animation.step(&mut input, &mut presenter).expect("step failed");

        let params = animation.params();
        assert_eq!(params.amplitude, 20.0);
        assert_eq!(params.frequency, TAU / 30.0);
        assert!((params.phase - SIMPLE_PHASE_STEP).abs() < 1e-9);
    }

    #[test]
    fn frame_delay_per_mode() {
        assert_eq!(get_driver(Mode::Simple).frame_delay(), Some(SIMPLE_FRAME_DELAY));
        assert_eq!(get_driver(Mode::Interactive).frame_delay(), None);
        assert_eq!(Mode::default(), Mode::Interactive);
        assert_eq!(Mode::Simple.to_string(), "simple");
    }
}
