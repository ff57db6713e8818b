use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Palette;
use crate::leaderboard::Leaderboard;
use crate::session::FrameView;

/// Draws the start screen with the leaderboard as a centered popup.
pub fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FrameView<'_>,
    palette: &Palette,
) {
    let popup = centered_popup(area, 80, 80);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("CANDY SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(palette.title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let mut body = leaderboard_lines(view.leaderboard, palette);
    body.push(Line::from(""));
    body.push(Line::from("[Space]/[Enter] Start"));
    body.push(Line::from("[Q]/[Esc] Quit"));
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" sweetest scores ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD, swipe, or the pad to steer"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, palette: &Palette) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space]/[P] Resume"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.title))
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FrameView<'_>,
    palette: &Palette,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default()
                .fg(palette.score)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Score: {}", view.score)),
        Line::from(format!("High score: {}", view.high_score)),
        Line::from(""),
        Line::from("[Enter]/[R] Play Again"),
        Line::from("[Q]/[Esc] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// Draws the initials editor for a qualifying score.
pub fn render_initials_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FrameView<'_>,
    palette: &Palette,
) {
    let popup = centered_popup(area, 80, 55);
    frame.render_widget(Clear, popup);

    let mut slots = Vec::new();
    if let Some(initials) = view.initials {
        for (index, letter) in initials.letters().iter().enumerate() {
            let style = if index == initials.cursor() {
                Style::default()
                    .fg(palette.score)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(palette.muted)
            };
            slots.push(Span::styled(format!(" {letter} "), style));
        }
    }

    let lines = vec![
        Line::from(Span::styled(
            "NEW HIGH SCORE!",
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(score_with_rank(view.leaderboard, view.score)),
        Line::from(""),
        Line::from(slots),
        Line::from(""),
        Line::from("Type letters or use ↑↓ ←→"),
        Line::from("[Enter] Save  [Esc] Skip"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" enter initials ")),
        popup,
    );
}

/// Score line for the initials prompt, with the place the score will take.
fn score_with_rank(board: &Leaderboard, score: u32) -> String {
    match board.potential_rank(score) {
        Some(rank) => format!("Score: {score}  Rank #{rank}"),
        None => format!("Score: {score}"),
    }
}

fn leaderboard_lines(board: &Leaderboard, palette: &Palette) -> Vec<Line<'static>> {
    if board.is_empty() {
        return vec![Line::from(Span::styled(
            "No scores yet",
            Style::default().fg(palette.muted),
        ))];
    }

    board
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Line::from(format!(
                "{:>2}. {:<3} {:>6}",
                index + 1,
                entry.name.as_str(),
                entry.score
            ))
        })
        .collect()
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
