use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::state::AppState;
use super::super::theme::*;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(" 🎧 moodmix ", header_style()),
        Span::styled("  turn any playlist into a mood", muted_style()),
    ]);
    f.render_widget(Paragraph::new(title).style(normal_style().bg(BG_ALT)), cols[0]);

    let who = match &state.user_name {
        Some(name) => Line::from(vec![
            Span::styled("● ", success_style()),
            Span::styled(format!("Connected as {name} "), dim_style()),
        ]),
        None => Line::from(Span::styled("○ Not connected ", muted_style())),
    };
    f.render_widget(
        Paragraph::new(who)
            .alignment(ratatui::layout::Alignment::Right)
            .style(normal_style().bg(BG_ALT)),
        cols[1],
    );
}

pub fn render_key_hints(f: &mut Frame, area: Rect, state: &AppState) {
    let hints: &[(&str, &str)] = if state.editing_text() {
        &[("Tab", "next"), ("Enter", "create"), ("Esc", "quit"), ("F1", "help")]
    } else {
        &[
            ("Tab", "next"),
            ("↑↓", "change"),
            ("1-8", "mood"),
            ("Space", "toggle"),
            ("Enter", "create"),
            ("o", "open"),
            ("?", "help"),
            ("q", "quit"),
        ]
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, what) in hints {
        spans.push(Span::styled(format!(" {key} "), accent_style()));
        spans.push(Span::styled(format!("{what}  "), muted_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(normal_style().bg(BG_ALT)), area);
}
