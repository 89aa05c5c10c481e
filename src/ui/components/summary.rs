use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::state::{AppState, MixStatus};
use super::super::theme::*;

pub fn render_summary(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(Span::styled(" Result ", title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(false))
        .style(normal_style().bg(BG));

    let lines: Vec<Line> = match &state.status {
        MixStatus::Idle => vec![
            Line::from(Span::styled("  Paste a playlist link, pick a mood,", muted_style())),
            Line::from(Span::styled("  then press Enter to build your mix.", muted_style())),
        ],
        MixStatus::Running => vec![Line::from(vec![
            Span::styled(format!("  {} ", state.spinner()), accent_style()),
            Span::styled(format!("Mixing in {} mode…", state.form.mode), normal_style()),
        ])],
        MixStatus::Done(summary) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("  ✔ ", success_style()),
                    Span::styled(summary.name.clone(), success_style()),
                ]),
                Line::from(vec![
                    Span::styled("    mood  ", muted_style()),
                    Span::styled(summary.mood.to_string(), Style::default().fg(mood_color(summary.mood))),
                ]),
                Line::from(vec![
                    Span::styled("    mode  ", muted_style()),
                    Span::styled(summary.mode.to_string(), normal_style()),
                ]),
                Line::from(vec![
                    Span::styled("    tracks ", muted_style()),
                    Span::styled(summary.track_count.to_string(), normal_style()),
                ]),
            ];
            if let Some(url) = &summary.url {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("  ", muted_style()),
                    Span::styled(url.clone(), link_style()),
                ]));
                lines.push(Line::from(Span::styled("  [o] open in browser", dim_style())));
            }
            for notice in &summary.notices {
                lines.push(Line::from(Span::styled(format!("  ℹ {notice}"), accent_style())));
            }
            lines
        }
        MixStatus::Failed { message, hint, url } => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("  ✖ ", error_style()),
                    Span::styled(message.clone(), error_style()),
                ]),
                Line::from(""),
                Line::from(Span::styled(format!("  {hint}"), dim_style())),
            ];
            if let Some(url) = url {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(format!("  {url}"), link_style())));
            }
            lines
        }
    };

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
