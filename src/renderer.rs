use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::config::{
    GLYPH_FOOD, GLYPH_HALF_LEFT, GLYPH_HALF_UPPER, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN,
    GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, GLYPH_TAIL_DOWN,
    GLYPH_TAIL_LEFT, GLYPH_TAIL_RIGHT, GLYPH_TAIL_UP, GridSize,
};
use crate::game::{GameState, GameStatus};
use crate::input::Direction;
use crate::palette::{Palette, default_palette};
use crate::snake::{Position, Snake};

/// How one body cell is drawn.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SegmentKind {
    /// Head cell, eyes facing the heading.
    Head(Direction),
    Body,
    /// Cell before the tail, blending body into tail color towards the tail.
    Blend(Direction),
    /// Tail triangle pointing away from the body.
    Tail(Direction),
}

/// Classifies every segment of `snake`, head first.
///
/// The tail and the cell before it are oriented by the step from the
/// second-to-last segment to the tail. While those two cells still coincide
/// the orientation falls back to the reverse of the heading.
#[must_use]
pub fn describe_segments(snake: &Snake) -> Vec<(Position, SegmentKind)> {
    let body = snake.body();
    let len = body.len();
    let trailing = if len >= 2 {
        Direction::between(body[len - 2], body[len - 1])
    } else {
        None
    }
    .unwrap_or_else(|| snake.direction().opposite());

    body.iter()
        .enumerate()
        .map(|(index, &position)| {
            let kind = if index == 0 {
                SegmentKind::Head(snake.direction())
            } else if index == len - 1 {
                SegmentKind::Tail(trailing)
            } else if index == len - 2 {
                SegmentKind::Blend(trailing)
            } else {
                SegmentKind::Body
            };
            (position, kind)
        })
        .collect()
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState, message: Option<&str>) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let title = match state.status {
        GameStatus::Playing => " grid-snake ",
        GameStatus::Paused => " grid-snake (paused) ",
    };
    let block = Block::bordered().title(title);
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    if let Some(food) = state.food {
        render_food(frame, inner, state.bounds(), food.position);
    }

    for (index, player) in state.players.iter().enumerate() {
        let palette = player
            .snake
            .palette()
            .unwrap_or_else(|| default_palette(index));
        render_snake(frame, inner, state.bounds(), &player.snake, palette);
    }

    frame.render_widget(Paragraph::new(hud_line(state, message)), hud_area);
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, position: Position) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, position) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red));
}

fn render_snake(
    frame: &mut Frame<'_>,
    inner: Rect,
    bounds: GridSize,
    snake: &Snake,
    palette: Palette,
) {
    let body = Color::from(palette.body);
    let tail = Color::from(palette.tail);
    let buffer = frame.buffer_mut();

    // Tail first so the head stays visible on stacked cells.
    for (position, kind) in describe_segments(snake).into_iter().rev() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, position) else {
            continue;
        };

        let (glyph, style) = match kind {
            SegmentKind::Head(direction) => (
                head_glyph(direction),
                Style::new()
                    .fg(Color::Black)
                    .bg(body)
                    .add_modifier(Modifier::BOLD),
            ),
            SegmentKind::Body => (GLYPH_SNAKE_BODY, Style::new().fg(body)),
            SegmentKind::Blend(direction) => blend_cell(direction, palette),
            SegmentKind::Tail(direction) => (tail_glyph(direction), Style::new().fg(tail)),
        };

        buffer.set_string(x, y, glyph, style);
    }
}

/// Half-block whose body-colored half faces the body and whose other half,
/// a body/tail mid-tone, faces the tail.
fn blend_cell(towards_tail: Direction, palette: Palette) -> (&'static str, Style) {
    let body = Color::from(palette.body);
    let tail = Color::from(palette.body.midpoint(palette.tail));
    match towards_tail {
        Direction::Right => (GLYPH_HALF_LEFT, Style::new().fg(body).bg(tail)),
        Direction::Left => (GLYPH_HALF_LEFT, Style::new().fg(tail).bg(body)),
        Direction::Down => (GLYPH_HALF_UPPER, Style::new().fg(body).bg(tail)),
        Direction::Up => (GLYPH_HALF_UPPER, Style::new().fg(tail).bg(body)),
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn tail_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_TAIL_UP,
        Direction::Down => GLYPH_TAIL_DOWN,
        Direction::Left => GLYPH_TAIL_LEFT,
        Direction::Right => GLYPH_TAIL_RIGHT,
    }
}

fn hud_line<'a>(state: &GameState, message: Option<&'a str>) -> Line<'a> {
    let mut spans = Vec::new();

    for (index, player) in state.players.iter().enumerate() {
        let palette = player
            .snake
            .palette()
            .unwrap_or_else(|| default_palette(index));
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("P{}", index + 1),
            Style::new()
                .fg(Color::from(palette.body))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(
            " score {} len {}",
            player.score,
            player.snake.len()
        )));
    }

    if let Some(message) = message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message, Style::new().fg(Color::Yellow)));
    }

    Line::from(spans)
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
