pub mod components;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::state::AppState;
use self::theme::*;
use self::components::{
    centered_rect,
    form::{render_form, render_moods},
    help::render_help,
    status_bar::{render_key_hints, render_status_bar},
    summary::render_summary,
};

/// Root render function, called every frame.
pub fn render(f: &mut Frame, state: &AppState) {
    let size = f.area();
    f.render_widget(Block::default().style(normal_style().bg(BG)), size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(0),    // form + side panel
            Constraint::Length(1), // key hints
        ])
        .split(size);

    render_status_bar(f, rows[0], state);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(16), Constraint::Min(0)])
        .split(cols[1]);

    render_form(f, cols[0], state);
    render_moods(f, side[0], state);
    render_summary(f, side[1], state);
    render_key_hints(f, rows[2], state);

    if !state.is_authenticated {
        render_auth_overlay(f, size, state);
    }

    if state.show_help {
        render_help(f, size);
    }

    if let Some(ref notif) = state.notification {
        render_notification(f, size, notif.is_error, &notif.message);
    }
}

fn render_auth_overlay(f: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(70, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" 🎧 moodmix · Spotify login ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border_style(true))
        .style(normal_style().bg(BG_ALT));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = if let Some(ref url) = state.auth_url {
        vec![
            Line::from(""),
            Line::from(Span::styled("  Opening browser for Spotify login...", accent_style())),
            Line::from(""),
            Line::from(Span::styled("  If the browser didn't open, visit:", dim_style())),
            Line::from(""),
            Line::from(Span::styled(format!("  {url}"), link_style())),
            Line::from(""),
            Line::from(Span::styled(
                format!("  Waiting for the redirect on {}", state.redirect_uri),
                muted_style(),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled("  Connecting to Spotify...", accent_style())),
        ]
    };

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Left).wrap(Wrap { trim: false }),
        inner,
    );
}

fn render_notification(f: &mut Frame, area: Rect, is_error: bool, message: &str) {
    let toast_width = (message.width().min(60) as u16 + 6).min(area.width);
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(5),
        width: toast_width,
        height: 3.min(area.height),
    };

    f.render_widget(Clear, toast_area);

    let style = if is_error { error_style() } else { success_style() };
    let icon = if is_error { "✖ " } else { "✔ " };

    let para = Paragraph::new(Line::from(vec![
        Span::styled(icon, style),
        Span::styled(message.to_string(), style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style),
    )
    .alignment(Alignment::Left);

    f.render_widget(para, toast_area);
}
