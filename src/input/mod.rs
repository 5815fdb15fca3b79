mod terminal;

pub use terminal::TerminalInput;

use std::collections::{BTreeSet, VecDeque};
use strum::{EnumIter, IntoEnumIterator};

/// The logical keys the animation reacts to.
///
/// Physical bindings live with each [`InputSource`] implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum LogicalKey {
    IncreaseAmplitude,
    DecreaseAmplitude,
    DecreaseFrequency,
    IncreaseFrequency,
    DecreasePhase,
    IncreasePhase,
    Up,
    Down,
    Brake,
    Quit,
}

/// A capability that reports which logical keys are held down.
pub trait InputSource {
    /// Refresh key state. Called exactly once per frame before any [`InputSource::is_key_down`].
    fn poll(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    fn is_key_down(&self, key: LogicalKey) -> bool;
}

/// The set of keys held during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveKeys(BTreeSet<LogicalKey>);

impl ActiveKeys {
    pub fn contains(&self, key: LogicalKey) -> bool {
        self.0.contains(&key)
    }

    pub fn quit_requested(&self) -> bool {
        self.contains(LogicalKey::Quit)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate keys in a fixed order, independent of how they were reported.
    pub fn iter(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<LogicalKey> for ActiveKeys {
    fn from_iter<T: IntoIterator<Item = LogicalKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Poll `source` once and collect every logical key it reports as held.
pub fn sample<I: InputSource + ?Sized>(source: &mut I) -> Result<ActiveKeys, InputError> {
    source.poll()?;
    Ok(LogicalKey::iter().filter(|key| source.is_key_down(*key)).collect())
}

/// An input source with nothing ever pressed.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_key_down(&self, _key: LogicalKey) -> bool {
        false
    }
}

/// Replays a fixed script of per-frame key sets, one entry per poll.
///
/// Once the script runs out no key is reported as held.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<ActiveKeys>,
    current: ActiveKeys,
    polls: usize,
}

impl ScriptedInput {
    pub fn new<F, K>(frames: F) -> Self
    where
        F: IntoIterator<Item = K>,
        K: IntoIterator<Item = LogicalKey>,
    {
        let frames = frames.into_iter().map(|keys| keys.into_iter().collect()).collect();
        Self { frames, current: ActiveKeys::default(), polls: 0 }
    }

    /// How many times this source has been polled.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<(), InputError> {
        self.polls += 1;
        self.current = self.frames.pop_front().unwrap_or_default();
        Ok(())
    }

    fn is_key_down(&self, key: LogicalKey) -> bool {
        self.current.contains(key)
    }
}

/// Errors that can occur when reading input
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("failed to read terminal events: {0}")]
    Io(#[from] std::io::Error),
}
