use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};

use crate::config::Palette;
use crate::input::Direction;

const BUTTON_WIDTH: u16 = 4;
const BUTTON_HEIGHT: u16 = 3;

/// On-screen direction buttons for mouse and touch terminals.
///
/// Laid out as a plus sign in the top-left of the given area.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DirectionPad {
    up: Rect,
    down: Rect,
    left: Rect,
    right: Rect,
}

impl DirectionPad {
    /// Lays the pad out inside `area`; buttons that do not fit are empty.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let button = |column: u16, row: u16| {
            Rect {
                x: area.x + column * BUTTON_WIDTH,
                y: area.y + row * BUTTON_HEIGHT,
                width: BUTTON_WIDTH,
                height: BUTTON_HEIGHT,
            }
            .intersection(area)
        };

        Self {
            up: button(1, 0),
            left: button(0, 1),
            right: button(2, 1),
            down: button(1, 2),
        }
    }

    fn buttons(&self) -> [(Direction, Rect, &'static str); 4] {
        [
            (Direction::Up, self.up, "▲"),
            (Direction::Down, self.down, "▼"),
            (Direction::Left, self.left, "◀"),
            (Direction::Right, self.right, "▶"),
        ]
    }

    /// Direction of the button under terminal cell `(column, row)`.
    #[must_use]
    pub fn hit(&self, column: u16, row: u16) -> Option<Direction> {
        self.buttons()
            .into_iter()
            .find(|(_, rect, _)| !rect.is_empty() && rect.contains((column, row).into()))
            .map(|(direction, _, _)| direction)
    }

    pub fn render(&self, frame: &mut Frame<'_>, palette: &Palette) {
        for (_, rect, label) in self.buttons() {
            if rect.is_empty() {
                continue;
            }
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(palette.snake_head))
                    .block(Block::bordered().border_style(Style::default().fg(palette.border))),
                rect,
            );
        }
    }
}
