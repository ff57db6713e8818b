use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use unicode_width::UnicodeWidthStr;

use crate::config::{GridSize, Palette};
use crate::effects::EffectKind;
use crate::game::GamePhase;
use crate::interpolator::DrawPoint;
use crate::session::FrameView;
use crate::snake::Position;
use crate::ui::controls::DirectionPad;
use crate::ui::hud::render_hud;
use crate::ui::menu::{
    render_game_over_menu, render_initials_menu, render_pause_menu, render_start_menu,
};

/// Terminal columns per board cell; two columns make cells roughly square.
pub const CELL_COLUMNS: u16 = 2;

const HEAD_GLYPH: &str = "██";
const BODY_GLYPH: &str = "▓▓";
const PAD_WIDTH: u16 = 12;
/// How far sparkles fly, in cells, by the end of a burst.
const BURST_RADIUS_CELLS: f32 = 1.5;

/// Screen regions the input layer hit-tests against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenLayout {
    /// Inner board area, one cell = `CELL_COLUMNS`×1 terminal cells.
    pub board: Rect,
    pub pad: DirectionPad,
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, view: &FrameView<'_>, palette: &Palette) -> ScreenLayout {
    let area = frame.area();
    let [hud_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    render_hud(frame, hud_area, view, palette);

    let board_width = view.bounds.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let board_height = view.bounds.height.saturating_add(2);
    let [board_column, pad_column, _] = Layout::horizontal([
        Constraint::Length(board_width),
        Constraint::Length(PAD_WIDTH),
        Constraint::Min(0),
    ])
    .areas(body_area);
    let [board_area, _] =
        Layout::vertical([Constraint::Length(board_height), Constraint::Min(0)])
            .areas(board_column);

    let block = Block::bordered().border_style(Style::new().fg(palette.border));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_checkerboard(frame, inner, view.bounds, palette);
    render_candies(frame, inner, view);
    render_snake(frame, inner, view, palette);
    render_effects(frame, inner, view, palette);

    let pad = DirectionPad::new(pad_column);
    pad.render(frame, palette);

    match view.phase {
        GamePhase::Idle => render_start_menu(frame, board_area, view, palette),
        GamePhase::Paused => render_pause_menu(frame, board_area, palette),
        GamePhase::Over => render_game_over_menu(frame, board_area, view, palette),
        GamePhase::EnteringInitials => render_initials_menu(frame, board_area, view, palette),
        GamePhase::Playing => {}
    }

    ScreenLayout { board: inner, pad }
}

fn render_checkerboard(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, palette: &Palette) {
    let buffer = frame.buffer_mut();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let Some((column, row)) = cell_to_terminal(inner, bounds, Position { x, y }) else {
                continue;
            };
            let bg = if (x + y) % 2 == 0 {
                palette.board_light
            } else {
                palette.board_dark
            };
            buffer.set_string(column, row, "  ", Style::new().bg(bg));
        }
    }
}

fn render_candies(frame: &mut Frame<'_>, inner: Rect, view: &FrameView<'_>) {
    let buffer = frame.buffer_mut();
    for candy in view.candies {
        let Some((column, row)) = cell_to_terminal(inner, view.bounds, candy.position) else {
            continue;
        };
        buffer.set_string(column, row, candy.kind.glyph(), Style::new());
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, view: &FrameView<'_>, palette: &Palette) {
    let len = view.segments.len();
    let buffer = frame.buffer_mut();

    // Tail first so the head is painted on top.
    for (index, point) in view.segments.iter().enumerate().rev() {
        let Some((column, row)) = point_to_terminal(inner, view.bounds, *point) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                column,
                row,
                HEAD_GLYPH,
                Style::new()
                    .fg(palette.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
            continue;
        }

        let color = palette.snake_body[gradient_index(index, len, palette.snake_body.len())];
        buffer.set_string(column, row, BODY_GLYPH, Style::new().fg(color));
    }
}

fn render_effects(frame: &mut Frame<'_>, inner: Rect, view: &FrameView<'_>, palette: &Palette) {
    let buffer = frame.buffer_mut();
    for effect in view.effects.iter() {
        match &effect.kind {
            EffectKind::Burst { origin, sparkles } => {
                let radius = effect.progress(view.now) * BURST_RADIUS_CELLS;
                for sparkle in sparkles {
                    let point = DrawPoint {
                        x: origin.x as f32 + sparkle.angle.cos() * radius,
                        y: origin.y as f32 + sparkle.angle.sin() * radius,
                    };
                    if let Some((column, row)) = point_to_terminal(inner, view.bounds, point) {
                        buffer.set_string(
                            column,
                            row,
                            sparkle.glyph,
                            Style::new().fg(palette.sparkle),
                        );
                    }
                }
            }
            EffectKind::Message { text } => {
                let width = u16::try_from(text.width()).unwrap_or(inner.width);
                let column = inner.x + inner.width.saturating_sub(width) / 2;
                let row = inner.y + inner.height / 4;
                buffer.set_string(
                    column,
                    row,
                    text,
                    Style::new()
                        .fg(palette.message)
                        .add_modifier(Modifier::BOLD),
                );
            }
        }
    }
}

/// Maps a segment's place in the body onto the gradient.
fn gradient_index(index: usize, len: usize, steps: usize) -> usize {
    (index * steps / len.max(1)).min(steps.saturating_sub(1))
}

fn cell_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }
    point_to_terminal(inner, bounds, DrawPoint::at(position))
}

/// Converts continuous cell coordinates to a terminal column/row. Horizontal
/// motion resolves to half cells because each cell spans two columns.
fn point_to_terminal(inner: Rect, bounds: GridSize, point: DrawPoint) -> Option<(u16, u16)> {
    let max_x = f32::from(bounds.width) - 0.5;
    let max_y = f32::from(bounds.height) - 0.5;
    if point.x < -0.25 || point.y < -0.5 || point.x > max_x || point.y >= max_y + 0.5 {
        return None;
    }

    let x_offset = (point.x.max(0.0) * f32::from(CELL_COLUMNS)).round() as u16;
    let y_offset = point.y.max(0.0).round() as u16;

    let column = inner.x.saturating_add(x_offset);
    let row = inner.y.saturating_add(y_offset);
    if column.saturating_add(CELL_COLUMNS) > inner.right() || row >= inner.bottom() {
        return None;
    }

    Some((column, row))
}
