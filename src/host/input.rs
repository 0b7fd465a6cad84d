//! Input Module - Terminal events to host commands
//!
//! Bridges crossterm's event system with the surface's host hooks.
//!
//! # Key map
//!
//! | Key | Command |
//! |---|---|
//! | arrows | pan by [`PAN_STEP`] pixels |
//! | `+` / `=` / `-` | zoom in / out |
//! | mouse wheel | zoom in / out |
//! | `h` / `s` | hide / show the surface |
//! | `b` / `f` | app to background / foreground |
//! | `q`, `Esc`, `Ctrl+C` | quit |
//!
//! # Example
//!
//! ```ignore
//! use poi_map::host::{poll_command, HostCommand};
//! use std::time::Duration;
//!
//! while let Ok(Some(command)) = poll_command(Duration::from_millis(16)) {
//!     if command == HostCommand::Quit {
//!         break;
//!     }
//! }
//! ```

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Pixels moved per arrow key press.
pub const PAN_STEP: f64 = 40.0;

/// What the host wants the surface (or the simulated engine) to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCommand {
    /// Drag the map by a pixel offset.
    Pan { dx: f64, dy: f64 },
    /// Change the zoom level by the given number of steps.
    Zoom(i32),
    Hide,
    Show,
    Background,
    Foreground,
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    Quit,
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent to a host command.
pub fn convert_key_event(event: CrosstermKeyEvent) -> HostCommand {
    if event.kind == KeyEventKind::Release {
        return HostCommand::None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return HostCommand::Quit;
    }

    match event.code {
        KeyCode::Up => HostCommand::Pan { dx: 0.0, dy: -PAN_STEP },
        KeyCode::Down => HostCommand::Pan { dx: 0.0, dy: PAN_STEP },
        KeyCode::Left => HostCommand::Pan { dx: -PAN_STEP, dy: 0.0 },
        KeyCode::Right => HostCommand::Pan { dx: PAN_STEP, dy: 0.0 },
        KeyCode::Char('+') | KeyCode::Char('=') => HostCommand::Zoom(1),
        KeyCode::Char('-') => HostCommand::Zoom(-1),
        KeyCode::Char('h') => HostCommand::Hide,
        KeyCode::Char('s') => HostCommand::Show,
        KeyCode::Char('b') => HostCommand::Background,
        KeyCode::Char('f') => HostCommand::Foreground,
        KeyCode::Char('q') | KeyCode::Esc => HostCommand::Quit,
        _ => HostCommand::None,
    }
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> HostCommand {
    match event.kind {
        MouseEventKind::ScrollUp => HostCommand::Zoom(1),
        MouseEventKind::ScrollDown => HostCommand::Zoom(-1),
        _ => HostCommand::None,
    }
}

/// Convert any crossterm event to a host command.
pub fn convert_event(event: CrosstermEvent) -> HostCommand {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Resize(w, h) => HostCommand::Resize(w, h),
        CrosstermEvent::FocusLost => HostCommand::Background,
        CrosstermEvent::FocusGained => HostCommand::Foreground,
        _ => HostCommand::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a command with timeout.
/// Returns None if no terminal event arrived within timeout.
pub fn poll_command(timeout: Duration) -> std::io::Result<Option<HostCommand>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_arrows_pan() {
        let arrows = [
            (KeyCode::Up, (0.0, -PAN_STEP)),
            (KeyCode::Down, (0.0, PAN_STEP)),
            (KeyCode::Left, (-PAN_STEP, 0.0)),
            (KeyCode::Right, (PAN_STEP, 0.0)),
        ];

        for (code, (dx, dy)) in arrows {
            assert_eq!(convert_key_event(key(code)), HostCommand::Pan { dx, dy });
        }
    }

    #[test]
    fn test_convert_lifecycle_keys() {
        assert_eq!(convert_key_event(key(KeyCode::Char('h'))), HostCommand::Hide);
        assert_eq!(convert_key_event(key(KeyCode::Char('s'))), HostCommand::Show);
        assert_eq!(convert_key_event(key(KeyCode::Char('b'))), HostCommand::Background);
        assert_eq!(convert_key_event(key(KeyCode::Char('f'))), HostCommand::Foreground);
        assert_eq!(convert_key_event(key(KeyCode::Char('+'))), HostCommand::Zoom(1));
        assert_eq!(convert_key_event(key(KeyCode::Char('-'))), HostCommand::Zoom(-1));
    }

    #[test]
    fn test_convert_quit() {
        assert_eq!(convert_key_event(key(KeyCode::Esc)), HostCommand::Quit);
        assert_eq!(convert_key_event(key(KeyCode::Char('q'))), HostCommand::Quit);

        let mut ctrl_c = key(KeyCode::Char('c'));
        ctrl_c.modifiers = KeyModifiers::CONTROL;
        assert_eq!(convert_key_event(ctrl_c), HostCommand::Quit);
        assert_eq!(convert_key_event(key(KeyCode::Char('c'))), HostCommand::None);
    }

    #[test]
    fn test_release_ignored() {
        let mut release = key(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(convert_key_event(release), HostCommand::None);
    }

    #[test]
    fn test_convert_resize_and_scroll() {
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), HostCommand::Resize(80, 24));

        let scroll = CrosstermMouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::empty(),
        };
        assert_eq!(convert_event(CrosstermEvent::Mouse(scroll)), HostCommand::Zoom(-1));
        assert_eq!(convert_event(CrosstermEvent::FocusLost), HostCommand::Background);
    }
}
