//! Terminal renderer for the marker canvas.
//!
//! Compares each canvas row to the previous frame and only rewrites rows
//! that changed. The status line under the canvas is rewritten when its
//! text changes.
//!
//! # Algorithm
//!
//! 1. For each row of the new canvas:
//!    - If the previous frame has the same size and an equal row: skip
//!    - Otherwise: move to the row start and print it
//! 2. Print the status line if it changed
//! 3. Flush once
//! 4. Store the canvas as previous for the next comparison

mod canvas;

pub use canvas::{MarkerCanvas, CLUSTER, EMPTY, MARKER};

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

#[derive(Default)]
pub struct MapRenderer {
    previous: Option<MarkerCanvas>,
    status: String,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write changed rows of `canvas` and the status line to `out`.
    ///
    /// Returns true if anything was written.
    pub fn render<W: Write>(&mut self, out: &mut W, canvas: &MarkerCanvas, status: &str) -> io::Result<bool> {
        let mut changed = false;
        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|p| p.width() == canvas.width() && p.height() == canvas.height());

        for y in 0..canvas.height() {
            let row = canvas.row(y);
            let unchanged = same_size && self.previous.as_ref().is_some_and(|p| p.row(y) == row);
            if unchanged {
                continue;
            }
            queue!(out, MoveTo(0, y), Print(row))?;
            changed = true;
        }

        if !same_size || self.status != status {
            queue!(out, MoveTo(0, canvas.height()), Clear(ClearType::CurrentLine), Print(status))?;
            self.status = status.to_string();
            changed = true;
        }

        out.flush()?;
        self.previous = Some(canvas.clone());
        Ok(changed)
    }

    /// Next render rewrites everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Enter the alternate screen with a hidden cursor.
    pub fn enter_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        self.invalidate();
        Ok(())
    }

    pub fn exit_fullscreen<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        execute!(out, Show, LeaveAlternateScreen)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Viewport};

    fn viewport() -> Viewport {
        Viewport::new(Location::new(127.0, 38.0), Location::new(128.0, 37.0), 14)
    }

    #[test]
    fn test_first_render_writes_everything() {
        let mut renderer = MapRenderer::new();
        let canvas = MarkerCanvas::new(4, 2);
        let mut out = Vec::new();

        assert!(renderer.render(&mut out, &canvas, "ready").unwrap());
        assert!(renderer.has_previous());
        assert!(String::from_utf8_lossy(&out).contains("ready"));
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut renderer = MapRenderer::new();
        let mut canvas = MarkerCanvas::new(4, 2);
        canvas.plot(&viewport(), &[Location::new(127.5, 37.5)]);
        let mut out = Vec::new();
        renderer.render(&mut out, &canvas, "ready").unwrap();

        let mut out = Vec::new();
        assert!(!renderer.render(&mut out, &canvas, "ready").unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_only_changed_rows_rewritten() {
        let mut renderer = MapRenderer::new();
        let mut canvas = MarkerCanvas::new(4, 2);
        let mut out = Vec::new();
        renderer.render(&mut out, &canvas, "").unwrap();

        canvas.plot(&viewport(), &[Location::new(127.1, 37.9)]);
        let mut out = Vec::new();
        assert!(renderer.render(&mut out, &canvas, "").unwrap());
        let written = String::from_utf8_lossy(&out);
        assert_eq!(written.matches(MARKER).count(), 1);
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = MapRenderer::new();
        let canvas = MarkerCanvas::new(2, 1);
        let mut out = Vec::new();
        renderer.render(&mut out, &canvas, "s").unwrap();

        renderer.invalidate();
        let mut out = Vec::new();
        assert!(renderer.render(&mut out, &canvas, "s").unwrap());
    }
}
