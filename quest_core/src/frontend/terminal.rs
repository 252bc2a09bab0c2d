//! Text terminal front-end built on crossterm.

use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use quest_rules::{Direction, Event, EventOption, MapPoint, PlayerState, ViewConfig, WorldData};
use std::io::{self, Stdout, Write};
use tracing::{debug, warn};

use super::layout::frame_viewport;
use super::{FrontendError, InputSource, Prompt, Renderer};

const TITLE: &str = "Parcel B: Beetle Quest";
const MINIMAP_COLS: u16 = 48;
const MINIMAP_ROWS: u16 = 12;
const MIN_TEXT_WIDTH: usize = 20;

/// Raw mode and the alternate screen, restored when dropped.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Raw mode goes on first. Once it is on, the session exists, so a
    /// failure while switching screens still restores the terminal on drop.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let session = Self { _private: () };
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(error) = terminal::disable_raw_mode()
            .and_then(|_| execute!(out, ResetColor, cursor::Show, LeaveAlternateScreen))
        {
            warn!(%error, "failed to restore terminal");
        }
    }
}

/// Reads key presses and maps them to directions and option indices.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }

    fn next_key(&mut self) -> Result<KeyEvent, FrontendError> {
        loop {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }
}

impl InputSource for KeyboardInput {
    fn await_direction(&mut self) -> Result<Prompt<Direction>, FrontendError> {
        loop {
            let key = self.next_key()?;
            if is_quit_key(&key) {
                return Ok(Prompt::Quit);
            }
            if let Some(direction) = direction_for_key(key.code) {
                return Ok(Prompt::Chosen(direction));
            }
            debug!(key = ?key.code, "ignored key on map");
        }
    }

    fn await_option_index(&mut self, max_options: usize) -> Result<Prompt<usize>, FrontendError> {
        loop {
            let key = self.next_key()?;
            if is_quit_key(&key) {
                return Ok(Prompt::Quit);
            }
            if let Some(index) = option_for_key(key.code, max_options) {
                return Ok(Prompt::Chosen(index));
            }
            debug!(key = ?key.code, max_options, "ignored key in event");
        }
    }
}

/// `q`, Esc and Ctrl-C all end the game.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Arrow keys, WASD and hjkl.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Direction::Down),
        _ => None,
    }
}

/// Digit keys `1..=max_options`, returned zero-based.
pub fn option_for_key(code: KeyCode, max_options: usize) -> Option<usize> {
    let KeyCode::Char(ch) = code else {
        return None;
    };
    let digit = ch.to_digit(10)? as usize;
    (1..=max_options).contains(&digit).then(|| digit - 1)
}

/// Draws scenes as plain text screens.
pub struct TerminalRenderer<'w> {
    out: Stdout,
    world: &'w WorldData,
    view: ViewConfig,
}

impl<'w> TerminalRenderer<'w> {
    pub fn new(world: &'w WorldData, view: ViewConfig) -> Self {
        Self {
            out: io::stdout(),
            world,
            view,
        }
    }

    fn text_width() -> usize {
        terminal::size()
            .map(|(cols, _)| usize::from(cols).saturating_sub(4))
            .unwrap_or(76)
            .max(MIN_TEXT_WIDTH)
    }

    fn begin_screen(&mut self, heading: &str) -> io::Result<u16> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::MoveTo(2, 1),
            Print(heading)
        )?;
        Ok(3)
    }

    fn status_line(&mut self, row: u16, player: &PlayerState) -> io::Result<u16> {
        let inventory = if player.inventory().is_empty() {
            "empty".to_string()
        } else {
            player.inventory().items().join(", ")
        };
        queue!(
            self.out,
            cursor::MoveTo(2, row),
            SetForegroundColor(Color::Red),
            Print(format!("Health: {}", player.health())),
            ResetColor,
            Print(format!("   Inventory: {inventory}"))
        )?;
        Ok(row + 2)
    }

    fn draw_minimap(&mut self, top: u16, point: &MapPoint) -> io::Result<u16> {
        let viewport = self.view.viewport;
        let framing = frame_viewport(self.view.background, viewport, point.center);
        if framing.offset != (0, 0) {
            debug!(point = %point.id, offset = ?framing.offset, "map view clamped at edge");
        }

        let border = format!("+{}+", "-".repeat(usize::from(MINIMAP_COLS)));
        queue!(self.out, cursor::MoveTo(2, top), Print(&border))?;
        for row in 0..MINIMAP_ROWS {
            queue!(
                self.out,
                cursor::MoveTo(2, top + 1 + row),
                Print("|"),
                cursor::MoveTo(3 + MINIMAP_COLS, top + 1 + row),
                Print("|")
            )?;
        }
        queue!(
            self.out,
            cursor::MoveTo(2, top + 1 + MINIMAP_ROWS),
            Print(&border)
        )?;

        for other in self.world.map_points() {
            if other.id == point.id {
                continue;
            }
            if let Some((col, row)) = framing.project(other.center, viewport, MINIMAP_COLS, MINIMAP_ROWS) {
                let glyph = if other.special_event.is_some() { '!' } else { '.' };
                queue!(self.out, cursor::MoveTo(3 + col, top + 1 + row), Print(glyph))?;
            }
        }
        if let Some((col, row)) = framing.project(point.center, viewport, MINIMAP_COLS, MINIMAP_ROWS) {
            queue!(
                self.out,
                cursor::MoveTo(3 + col, top + 1 + row),
                SetForegroundColor(Color::Yellow),
                Print('@'),
                ResetColor
            )?;
        }

        Ok(top + MINIMAP_ROWS + 3)
    }

    fn print_wrapped(&mut self, mut row: u16, text: &str) -> io::Result<u16> {
        for line in wrap_text(text, Self::text_width()) {
            queue!(self.out, cursor::MoveTo(2, row), Print(line))?;
            row += 1;
        }
        Ok(row + 1)
    }

    fn end_scene(&mut self, heading: &str, color: Color, message: &str) -> Result<(), FrontendError> {
        let row = self.begin_screen(TITLE)?;
        queue!(
            self.out,
            cursor::MoveTo(2, row),
            SetForegroundColor(color),
            Print(heading),
            ResetColor
        )?;
        self.print_wrapped(row + 2, message)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer<'_> {
    fn show_map_scene(&mut self, point: &MapPoint, player: &PlayerState) -> Result<(), FrontendError> {
        let row = self.begin_screen(TITLE)?;
        let row = self.status_line(row, player)?;
        let row = self.draw_minimap(row, point)?;

        let choices = point
            .directions
            .open()
            .map(|(direction, _)| direction.label())
            .collect::<Vec<_>>();
        let prompt = if choices.is_empty() {
            "Nowhere to go from here.".to_string()
        } else {
            format!("Choose {}", choices.join(" or "))
        };
        queue!(
            self.out,
            cursor::MoveTo(2, row),
            Print(prompt),
            cursor::MoveTo(2, row + 1),
            Print("(arrows or WASD to move, q to quit)")
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn show_event_scene(
        &mut self,
        event: &Event,
        player: &PlayerState,
        options: &[EventOption],
    ) -> Result<(), FrontendError> {
        let row = self.begin_screen(TITLE)?;
        let row = self.status_line(row, player)?;
        let mut row = self.print_wrapped(row, &event.text_prompt)?;

        for (index, option) in options.iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(4, row),
                Print(format!("{}) {}", index + 1, option.label))
            )?;
            row += 1;
        }
        queue!(
            self.out,
            cursor::MoveTo(2, row + 1),
            Print(format!("(press 1-{} to choose, q to quit)", options.len()))
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn show_death_scene(&mut self, message: &str) -> Result<(), FrontendError> {
        self.end_scene("YOU DIED", Color::Red, message)
    }

    fn show_win_scene(&mut self, message: &str) -> Result<(), FrontendError> {
        self.end_scene("YOU WIN", Color::Green, message)
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_never_leaves_raw_mode_behind() {
        // Without a tty, entering fails; with one, dropping the session restores it
        if let Ok(session) = TerminalSession::enter() {
            drop(session);
        }
        assert!(!terminal::is_raw_mode_enabled().unwrap_or(false));
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(direction_for_key(KeyCode::Left), Some(Direction::Left));
        assert_eq!(direction_for_key(KeyCode::Char('d')), Some(Direction::Right));
        assert_eq!(direction_for_key(KeyCode::Char('w')), Some(Direction::Up));
        assert_eq!(direction_for_key(KeyCode::Down), Some(Direction::Down));
        assert_eq!(direction_for_key(KeyCode::Char('x')), None);
        assert_eq!(direction_for_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_option_keys_respect_max() {
        assert_eq!(option_for_key(KeyCode::Char('1'), 2), Some(0));
        assert_eq!(option_for_key(KeyCode::Char('2'), 2), Some(1));
        assert_eq!(option_for_key(KeyCode::Char('3'), 2), None);
        assert_eq!(option_for_key(KeyCode::Char('0'), 4), None);
        assert_eq!(option_for_key(KeyCode::Char('z'), 4), None);
        assert_eq!(option_for_key(KeyCode::Up, 4), None);
    }

    #[test]
    fn test_quit_keys() {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert!(is_quit_key(&plain(KeyCode::Char('q'))));
        assert!(is_quit_key(&plain(KeyCode::Esc)));
        assert!(is_quit_key(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit_key(&plain(KeyCode::Char('c'))));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("The beetle guard wakes up in a very bad mood.", 16);
        assert_eq!(
            lines,
            vec!["The beetle guard", "wakes up in a", "very bad mood."]
        );
        assert!(lines.iter().all(|line| line.chars().count() <= 16));
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_text("a extraordinarily b", 5);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }
}
