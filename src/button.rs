use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::settings::Difficulty;

/// A clickable difficulty label on the inactive screen. The screen
/// rectangle is written back by the renderer each frame, so hit-testing
/// always runs against the last drawn layout.
pub struct Button {
    pub label: &'static str,
    pub difficulty: Difficulty,
    pub color: Color,
    pub area: Rect,
}

impl Button {
    pub fn new(difficulty: Difficulty) -> Self {
        Button {
            label: difficulty.label(),
            difficulty,
            color: difficulty.color(),
            area: Rect::default(),
        }
    }

    /// True if the terminal cell (column, row) falls inside the button as
    /// last rendered.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }
}
