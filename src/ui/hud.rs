use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Palette;
use crate::session::FrameView;

const TITLE: &str = "🍭 Candy Snake";

/// Renders the single HUD row: title on the left, counters on the right.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, view: &FrameView<'_>, palette: &Palette) {
    let [title_area, info_area] =
        Layout::horizontal([Constraint::Length(18), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(TITLE)).style(
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        ),
        title_area,
    );

    frame.render_widget(
        Paragraph::new(info_line(
            view.score,
            view.high_score,
            view.speed_level,
            view.snake_len,
            palette,
        ))
        .alignment(Alignment::Right),
        info_area,
    );
}

fn info_line(
    score: u32,
    high_score: u32,
    speed_level: u32,
    length: usize,
    palette: &Palette,
) -> Line<'static> {
    let muted = Style::default().fg(palette.muted);
    Line::from(vec![
        Span::styled("Len ", muted),
        Span::styled(length.to_string(), Style::default().fg(palette.muted)),
        Span::raw("  "),
        Span::styled("Lv ", muted),
        Span::styled(speed_level.to_string(), Style::default().fg(palette.muted)),
        Span::raw("  "),
        Span::styled("🍬 ", muted),
        Span::styled(
            padded_score(score),
            Style::default()
                .fg(palette.score)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("👑 ", muted),
        Span::styled(
            padded_score(high_score),
            Style::default().fg(palette.high_score),
        ),
    ])
}

/// Scores are shown zero-padded to four digits.
fn padded_score(score: u32) -> String {
    format!("{score:04}")
}

#[cfg(test)]
mod tests {
    use super::padded_score;

    #[test]
    fn scores_are_zero_padded() {
        assert_eq!(padded_score(0), "0000");
        assert_eq!(padded_score(45), "0045");
        assert_eq!(padded_score(12345), "12345");
    }
}
