use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use super::super::theme::*;

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" ❓ Keybindings ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(border_style(true))
        .style(normal_style().bg(BG));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(inner);

    let heading = |s: &'static str| Line::from(Span::styled(s, accent_style().add_modifier(Modifier::BOLD)));

    let left = vec![
        heading("  Form"),
        Line::from(""),
        key_line("Tab", "Next field"),
        key_line("Shift-Tab", "Previous field"),
        key_line("↑ / k", "Previous option"),
        key_line("↓ / j", "Next option"),
        key_line("1-8", "Pick a mood"),
        key_line("Space", "Toggle visibility"),
        key_line("Enter", "Create playlist"),
    ];

    let right = vec![
        heading("  Modes"),
        Line::from(""),
        key_line("distance", "Closest tracks"),
        key_line("recommend", "New tracks"),
        key_line("shuffle", "Seeded reorder"),
        Line::from(""),
        heading("  General"),
        Line::from(""),
        key_line("o", "Open created playlist"),
        key_line("? / F1", "Toggle this help"),
        key_line("q / Esc", "Quit"),
    ];

    f.render_widget(Paragraph::new(left), cols[0]);
    f.render_widget(Paragraph::new(right), cols[1]);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", muted_style()),
        Span::styled(format!("{key:<11}"), accent_style()),
        Span::styled(desc.to_string(), normal_style()),
    ])
}
