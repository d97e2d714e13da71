use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::{IsTerminal, Stdout, stdout};
use std::time::{Duration, Instant};

use crate::config::{CELL_HEIGHT, CELL_WIDTH, FRAME_BUDGET, HOLD_TIMEOUT};
use crate::error::InitializationError;
use crate::input::InputManager;
use crate::scheduler::FrameHost;
use crate::session::Session;

/// Rows reserved below the playfield for the controls hint
const HINT_ROWS: u16 = 1;

/// World size covered by a playfield of `area` cells
pub fn world_size(area: Rect) -> (f64, f64) {
    (
        area.width as f64 * CELL_WIDTH,
        area.height as f64 * CELL_HEIGHT,
    )
}

/// Splits the screen into playfield and controls hint
fn layout(area: Rect) -> (Rect, Rect) {
    let hint_rows = HINT_ROWS.min(area.height);
    let playfield = Rect {
        height: area.height - hint_rows,
        ..area
    };
    let hint = Rect {
        y: area.y + playfield.height,
        height: hint_rows,
        ..area
    };
    (playfield, hint)
}

/// Frame host backed by the terminal: paces frames, pumps keyboard input and presents the surface
pub struct TerminalHost {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input: InputManager,
    keyboard_enhanced: bool,
    last_frame: Instant,
}

impl TerminalHost {
    /// Takes over the terminal. Fails if stdout is not a terminal or cannot be switched to raw mode.
    pub fn init() -> Result<Self, InitializationError> {
        if !stdout().is_terminal() {
            return Err(InitializationError::SurfaceNotFound("stdout"));
        }

        let keyboard_enhanced = matches!(
            crossterm::terminal::supports_keyboard_enhancement(),
            Ok(true)
        );

        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events are only reported with the enhancement flags pushed
        if keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let input = if keyboard_enhanced {
            InputManager::new()
        } else {
            InputManager::with_hold_timeout(HOLD_TIMEOUT)
        };
        tracing::info!(keyboard_enhanced, "Terminal initialized");

        Ok(Self {
            terminal,
            input,
            keyboard_enhanced,
            last_frame: Instant::now(),
        })
    }

    /// World size matching the current playfield
    pub fn surface_size(&self) -> color_eyre::Result<(f64, f64)> {
        let size = self.terminal.size()?;
        let (playfield, _) = layout(Rect::new(0, 0, size.width, size.height));
        Ok(world_size(playfield))
    }

    /// Hands the terminal back to the shell
    pub fn restore(&mut self) -> color_eyre::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn present<R: Rng>(&mut self, session: &Session<R>) -> color_eyre::Result<()> {
        self.terminal.draw(|frame| render_frame(frame, session))?;
        Ok(())
    }

    /// Dispatches every pending terminal event into the session without blocking
    fn pump_events<R: Rng>(&mut self, session: &mut Session<R>) -> color_eyre::Result<()> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(input) = self.input.translate(key_event, Instant::now()) {
                        session.handle_key(input);
                    }
                }
                Event::Resize(width, height) => {
                    let (playfield, _) = layout(Rect::new(0, 0, width, height));
                    let (world_width, world_height) = world_size(playfield);
                    session.resize(world_width, world_height);
                }
                _ => {}
            }
        }

        for input in self.input.expire(Instant::now()) {
            session.handle_key(input);
        }
        Ok(())
    }
}

impl<R: Rng> FrameHost<Session<R>> for TerminalHost {
    fn request_frame(&mut self, session: &mut Session<R>) -> color_eyre::Result<bool> {
        self.present(session)?;

        // Sleep out the rest of the frame budget to maintain ~60 FPS
        let elapsed = self.last_frame.elapsed();
        if elapsed < FRAME_BUDGET {
            std::thread::sleep(FRAME_BUDGET - elapsed);
        }
        self.last_frame = Instant::now();

        self.pump_events(session)?;
        Ok(session.is_running())
    }
}

/// Logs how the session ended, then restores the terminal.
///
/// A session error takes precedence over a restore failure, which is only logged in that case.
pub fn finish_session<T>(
    result: color_eyre::Result<T>,
    restore: impl FnOnce() -> color_eyre::Result<()>,
) -> color_eyre::Result<T> {
    match &result {
        Ok(_) => tracing::info!("Session ended"),
        Err(err) => tracing::error!(%err, "Session failed"),
    }

    let restored = restore();
    match (result, restored) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), restored) => {
            if let Err(restore_err) = restored {
                tracing::error!(err = %restore_err, "Terminal restore failed");
            }
            Err(err)
        }
    }
}

/// Paints the session's surface plus the controls hint
fn render_frame<R: Rng>(frame: &mut Frame, session: &Session<R>) {
    let (playfield, hint) = layout(frame.area());
    frame.render_widget(&session.surface, playfield);

    let bindings = session.world.config().bindings;
    let movement = bindings.movement;
    let attack = bindings.attack;
    let controls = Line::from(vec![Span::styled(
        format!(
            "[{}{}{}{}: Move] [{}{}{}{}: Attack] [Q: Quit]",
            movement.up.to_ascii_uppercase(),
            movement.left.to_ascii_uppercase(),
            movement.down.to_ascii_uppercase(),
            movement.right.to_ascii_uppercase(),
            attack.up.to_ascii_uppercase(),
            attack.left.to_ascii_uppercase(),
            attack.down.to_ascii_uppercase(),
            attack.right.to_ascii_uppercase(),
        ),
        Style::default().fg(Color::DarkGray),
    )]);
    frame.render_widget(Paragraph::new(controls).centered(), hint);
}
