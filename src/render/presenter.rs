use super::buffer::{ScreenBuffer, BLANK};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::style::Print;
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
    EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// One finished frame: the grid plus the parameter readout overlaid on it, if any.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub buffer: &'a ScreenBuffer,
    pub info: Option<&'a str>,
}

/// A display surface frames get pushed to.
pub trait Presenter {
    fn present(&mut self, frame: &Frame) -> Result<(), PresentError>;
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, frame: &Frame) -> Result<(), PresentError> {
        (**self).present(frame)
    }
}

/// Errors that can occur when talking to the terminal
#[derive(thiserror::Error, Debug)]
pub enum PresentError {
    #[error("failed to set up terminal: {0}")]
    Setup(io::Error),

    #[error("failed to draw frame: {0}")]
    Draw(#[from] io::Error),
}

/// Exclusive use of the terminal: raw mode, alternate screen, hidden cursor and, when the
/// terminal supports it, key release reporting.
///
/// Everything acquired here is released on drop, on every exit path.
pub struct TerminalSession<W: Write> {
    writer: W,
    keyboard_enhanced: bool,
    /// Reusable scratch line so drawing a frame does not allocate
    line: String,
}

impl<W: Write> TerminalSession<W> {
    pub fn acquire(writer: W) -> Result<Self, PresentError> {
        terminal::enable_raw_mode().map_err(PresentError::Setup)?;
        // owning the writer from here on means a failure below still runs Drop
        let mut session = Self { writer, keyboard_enhanced: false, line: String::new() };
        execute!(session.writer, EnterAlternateScreen, Hide, DisableLineWrap, Clear(ClearType::All))
            .map_err(PresentError::Setup)?;

        session.keyboard_enhanced = match terminal::supports_keyboard_enhancement() {
            Ok(true) => execute!(
                session.writer,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok(),
            Ok(false) => false,
            Err(e) => {
                warn!("could not query keyboard enhancement support: {e}");
                false
            }
        };
        info!(keyboard_enhanced = session.keyboard_enhanced, "terminal acquired");
        Ok(session)
    }

    /// Whether the terminal reports key releases.
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl<W: Write> Presenter for TerminalSession<W> {
    fn present(&mut self, frame: &Frame) -> Result<(), PresentError> {
        write_frame(&mut self.writer, &mut self.line, frame)?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if let Err(e) = write_restore(&mut self.writer, self.keyboard_enhanced) {
            warn!("failed to restore terminal screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {e}");
        }
        debug!("terminal released");
    }
}

/// Draw every row of `frame` at its absolute position, inside one synchronized update.
///
/// `line` is scratch space reused across frames.
fn write_frame<W: Write>(writer: &mut W, line: &mut String, frame: &Frame) -> io::Result<()> {
    queue!(writer, BeginSynchronizedUpdate)?;
    for (row, cells) in frame.buffer.rows().enumerate() {
        line.clear();
        // control glyphs such as the terminator would move the cursor; draw them blank
        line.extend(cells.iter().map(|c| if c.is_control() { BLANK } else { *c }));
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(writer, MoveTo(0, row), Print(&*line))?;
    }
    queue!(writer, EndSynchronizedUpdate)?;
    writer.flush()
}

/// Undo the screen changes made by [`TerminalSession::acquire`]. Raw mode is left to the caller.
fn write_restore<W: Write>(writer: &mut W, keyboard_enhanced: bool) -> io::Result<()> {
    if keyboard_enhanced {
        // the screen still has to be restored if popping fails
        if let Err(e) = execute!(writer, PopKeyboardEnhancementFlags) {
            warn!("failed to pop keyboard enhancement flags: {e}");
        }
    }
    execute!(writer, EnableLineWrap, Show, LeaveAlternateScreen)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ScreenConfig;
    use crate::render::TERMINATOR;
    use rstest::rstest;

    /// Keeps a copy of every presented frame.
    #[derive(Default)]
    pub(crate) struct RecordingPresenter {
        pub(crate) frames: Vec<(ScreenBuffer, Option<String>)>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, frame: &Frame) -> Result<(), PresentError> {
            self.frames.push((frame.buffer.clone(), frame.info.map(str::to_string)));
            Ok(())
        }
    }

    fn present_blank<P: Presenter>(mut presenter: P, info: &str) {
        let buffer = ScreenBuffer::new(&ScreenConfig::default());
        presenter.present(&Frame { buffer: &buffer, info: Some(info) }).expect("present failed");
    }

    #[test]
    fn presenting_through_a_reference() {
        let mut recorder = RecordingPresenter::default();
        present_blank(&mut recorder, "first");
        present_blank(&mut recorder, "second");
        let infos: Vec<_> = recorder.frames.iter().map(|(_, info)| info.as_deref()).collect();
        assert_eq!(infos, vec![Some("first"), Some("second")]);
    }

    fn written_frame(buffer: &ScreenBuffer) -> String {
        let mut output = Vec::new();
        let mut line = String::new();
        write_frame(&mut output, &mut line, &Frame { buffer, info: None }).expect("write failed");
        String::from_utf8(output).expect("invalid utf8")
    }

    #[test]
    fn frame_rows_are_positioned_once_each() {
        let mut buffer = ScreenBuffer::new(&ScreenConfig::new(4, 3).expect("invalid config"));
        buffer.write_line(0, "ab");
        let output = written_frame(&buffer);

        for row in 1..=3 {
            assert_eq!(output.matches(&format!("\x1b[{row};1H")).count(), 1, "row {row}");
        }
        assert_eq!(output.matches('H').count(), 3);
        assert!(output.contains("\x1b[1;1Hab  "));
        assert!(output.starts_with("\x1b[?2026h"));
        assert!(output.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn terminator_is_drawn_blank() {
        let mut buffer = ScreenBuffer::new(&ScreenConfig::new(3, 2).expect("invalid config"));
        buffer.fill('#');
        buffer.terminate();
        let output = written_frame(&buffer);

        assert!(!output.contains(TERMINATOR));
        assert!(output.contains("\x1b[2;1H## "));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn restore_leaves_alternate_screen(#[case] keyboard_enhanced: bool) {
        let mut output = Vec::new();
        write_restore(&mut output, keyboard_enhanced).expect("restore failed");
        let output = String::from_utf8(output).expect("invalid utf8");

        assert!(output.contains("\x1b[?7h"), "line wrap not re-enabled");
        assert!(output.contains("\x1b[?25h"), "cursor not shown");
        assert!(output.ends_with("\x1b[?1049l"), "alternate screen not left");
        assert_eq!(output.contains("\x1b[<1u"), keyboard_enhanced);
    }
}
