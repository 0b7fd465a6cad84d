//! MarkerCanvas - Character grid of projected markers.
//!
//! Maps geographic locations inside a [`Viewport`] onto a `width × height`
//! grid of terminal cells. Longitude grows to the right, latitude grows
//! upwards, so the viewport's top-left corner lands on cell (0, 0).
//!
//! Flat row-major storage: `index = y * width + x`.

use crate::types::{Location, Viewport};

pub const EMPTY: char = ' ';
pub const MARKER: char = '●';
/// More than one marker in the same cell.
pub const CLUSTER: char = '◉';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCanvas {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl MarkerCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Cell for `location`, or `None` if it falls outside `viewport`.
    pub fn project(&self, viewport: &Viewport, location: Location) -> Option<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let span_lon = viewport.bottom_right.longitude - viewport.top_left.longitude;
        let span_lat = viewport.top_left.latitude - viewport.bottom_right.latitude;
        if span_lon <= 0.0 || span_lat <= 0.0 {
            return None;
        }

        let fx = (location.longitude - viewport.top_left.longitude) / span_lon;
        let fy = (viewport.top_left.latitude - location.latitude) / span_lat;
        if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
            return None;
        }

        let x = (fx * self.width as f64) as u16;
        let y = (fy * self.height as f64) as u16;
        Some((x.min(self.width - 1), y.min(self.height - 1)))
    }

    /// Clear, then plot every location. Returns how many landed on the grid.
    pub fn plot(&mut self, viewport: &Viewport, locations: &[Location]) -> usize {
        self.clear();
        let mut plotted = 0;
        for &location in locations {
            let Some((x, y)) = self.project(viewport, location) else {
                continue;
            };
            let i = self.index(x, y);
            self.cells[i] = if self.cells[i] == EMPTY { MARKER } else { CLUSTER };
            plotted += 1;
        }
        plotted
    }

    /// Row `y` as a string, `width` characters long.
    pub fn row(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize].iter().collect()
    }

    /// Resize, dropping every plotted marker.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![EMPTY; width as usize * height as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Location::new(127.0, 38.0), Location::new(128.0, 37.0), 14)
    }

    #[test]
    fn test_project_corners() {
        let canvas = MarkerCanvas::new(10, 5);
        assert_eq!(canvas.project(&viewport(), Location::new(127.0, 38.0)), Some((0, 0)));
        assert_eq!(canvas.project(&viewport(), Location::new(127.95, 37.05)), Some((9, 4)));
        assert_eq!(canvas.project(&viewport(), Location::new(127.5, 37.5)), Some((5, 2)));
    }

    #[test]
    fn test_project_outside() {
        let canvas = MarkerCanvas::new(10, 5);
        assert_eq!(canvas.project(&viewport(), Location::new(126.9, 37.5)), None);
        assert_eq!(canvas.project(&viewport(), Location::new(127.5, 38.5)), None);
        assert_eq!(canvas.project(&viewport(), Location::new(128.0, 37.5)), None);
    }

    #[test]
    fn test_plot_replaces_previous_markers() {
        let mut canvas = MarkerCanvas::new(10, 5);
        assert_eq!(canvas.plot(&viewport(), &[Location::new(127.0, 38.0), Location::new(127.01, 37.99)]), 2);
        assert_eq!(canvas.get(0, 0), Some(CLUSTER));

        assert_eq!(canvas.plot(&viewport(), &[Location::new(127.5, 37.5), Location::new(0.0, 0.0)]), 1);
        assert_eq!(canvas.get(0, 0), Some(EMPTY));
        assert_eq!(canvas.get(5, 2), Some(MARKER));
        assert_eq!(canvas.row(2).chars().filter(|c| *c == MARKER).count(), 1);
    }

    #[test]
    fn test_empty_canvas() {
        let mut canvas = MarkerCanvas::new(0, 0);
        assert_eq!(canvas.plot(&viewport(), &[Location::new(127.5, 37.5)]), 0);
        assert_eq!(canvas.row(0), "");
        canvas.resize(4, 2);
        assert_eq!(canvas.row(1), "    ");
    }
}
