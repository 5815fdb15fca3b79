use super::{InputError, InputSource, LogicalKey};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// How long a key counts as held after its last press or repeat event when the terminal
/// cannot report releases. Longer than common auto-repeat delays (X11 defaults to 660 ms).
const DEFAULT_HOLD_WINDOW: Duration = Duration::from_millis(700);

/// Derives key-down state from the crossterm event stream.
///
/// Terminals that speak the kitty keyboard protocol report releases, so a key is down from
/// its press until its release. Everywhere else a key is down for a short window after each
/// press or auto-repeat event.
#[derive(Debug)]
pub struct TerminalInput {
    /// Keys currently considered held, with the instant of their latest press/repeat
    held: HashMap<LogicalKey, Instant>,
    /// Keys pressed at some point during the latest poll, even if already released
    tapped: HashSet<LogicalKey>,
    /// Whether the terminal reports key release events
    reports_releases: bool,
    hold_window: Duration,
}

impl TerminalInput {
    pub fn new(reports_releases: bool) -> Self {
        Self {
            held: HashMap::new(),
            tapped: HashSet::new(),
            reports_releases,
            hold_window: DEFAULT_HOLD_WINDOW,
        }
    }

    /// Map a physical key event to the logical key it drives.
    pub fn bind(key: &KeyEvent) -> Option<LogicalKey> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(LogicalKey::Quit),
                _ => None,
            };
        }
        let key = match key.code {
            KeyCode::Char('w') | KeyCode::Char('W') => LogicalKey::IncreaseAmplitude,
            KeyCode::Char('s') | KeyCode::Char('S') => LogicalKey::DecreaseAmplitude,
            KeyCode::Char('a') | KeyCode::Char('A') => LogicalKey::DecreaseFrequency,
            KeyCode::Char('d') | KeyCode::Char('D') => LogicalKey::IncreaseFrequency,
            KeyCode::Char('q') | KeyCode::Char('Q') => LogicalKey::DecreasePhase,
            KeyCode::Char('e') | KeyCode::Char('E') => LogicalKey::IncreasePhase,
            KeyCode::Up => LogicalKey::Up,
            KeyCode::Down => LogicalKey::Down,
            KeyCode::Char(' ') => LogicalKey::Brake,
            KeyCode::Esc => LogicalKey::Quit,
            _ => return None,
        };
        Some(key)
    }

    /// Fold one key event observed at `now` into the held-key state.
    fn apply(&mut self, event: &KeyEvent, now: Instant) {
        let Some(key) = Self::bind(event) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(key, now);
                self.tapped.insert(key);
            }
            KeyEventKind::Release => {
                self.held.remove(&key);
            }
        }
    }

    /// Forget keys whose hold window lapsed. Only used when releases are never reported.
    fn expire(&mut self, now: Instant) {
        if self.reports_releases {
            return;
        }
        let window = self.hold_window;
        self.held.retain(|_, pressed_at| now.saturating_duration_since(*pressed_at) < window);
    }

    fn poll_at(&mut self, events: impl IntoIterator<Item = KeyEvent>, now: Instant) {
        self.tapped.clear();
        for event in events {
            self.apply(&event, now);
        }
        self.expire(now);
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Result<(), InputError> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                events.push(key);
            }
        }
        self.poll_at(events, Instant::now());
        Ok(())
    }

    fn is_key_down(&self, key: LogicalKey) -> bool {
        self.held.contains_key(&key) || self.tapped.contains(&key)
    }
}
