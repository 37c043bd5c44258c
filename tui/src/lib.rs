//! TUI rendering for Lector using ratatui.

mod format;
mod input;
mod theme;

pub use input::{InputMsg, InputPump, MAX_EVENTS_PER_FRAME, apply_input};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use lector_engine::{App, FeedRow};

use self::format::{badge, gutter};

/// Main draw function.
///
/// Renders the feed and publishes the frame's geometry (layout width,
/// viewport rows) to the app, so the post-frame observation pass sees exactly
/// what was drawn.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Feed
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_feed(frame, app, chunks[0], &palette);
    draw_status_bar(frame, app, chunks[1], &palette, &glyphs);
}

fn draw_feed(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    app.ensure_layout(area.width);
    app.set_viewport_rows(usize::from(area.height));

    let now = Instant::now();
    let options = app.ui_options();
    let viewport = app.viewport();
    let Some(layout) = app.layout() else {
        return;
    };

    let start = viewport.top.min(layout.total_rows());
    let end = (viewport.top + viewport.rows).min(layout.total_rows());

    let mut lines: Vec<Line> = Vec::with_capacity(end - start);
    for row in &layout.rows()[start..end] {
        let line = match row {
            FeedRow::Blank => Line::from(""),
            FeedRow::Title { article } => {
                let title = app
                    .articles()
                    .get(*article)
                    .map(|a| a.title().to_string())
                    .unwrap_or_default();
                Line::from(Span::styled(title, styles::title(palette)))
            }
            FeedRow::ParagraphLine { key, text, first } => {
                let active = app.timers().is_active(key);
                let badge_span = if *first {
                    let elapsed = app.timers().elapsed(key, now);
                    let style = if active {
                        styles::badge_active(palette)
                    } else {
                        styles::badge_idle(palette)
                    };
                    Span::styled(badge(elapsed), style)
                } else {
                    Span::raw(gutter())
                };
                let text_style = if active {
                    styles::paragraph_active(palette)
                } else {
                    styles::paragraph_idle(palette)
                };
                Line::from(vec![badge_span, Span::styled(text.clone(), text_style)])
            }
            FeedRow::Sentinel => {
                let spinner = spinner_frame(app.tick_count(), options);
                Line::from(Span::styled(
                    format!("{spinner} loading..."),
                    styles::sentinel(palette),
                ))
            }
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let left = format!(
        " {} articles {} {} paragraphs {} {} {} reading",
        app.articles().len(),
        glyphs.bullet,
        app.tracked_paragraphs(),
        glyphs.bullet,
        glyphs.reading,
        app.reading_count(),
    );
    let right = "j/k scroll  space page  g/G ends  q quit ";

    let width = usize::from(area.width);
    let padding = width.saturating_sub(left.width() + right.width());
    let text = format!("{left}{}{right}", " ".repeat(padding));

    let status = Paragraph::new(Line::from(Span::styled(text, styles::status_bar(palette))));
    frame.render_widget(status, area);
}
