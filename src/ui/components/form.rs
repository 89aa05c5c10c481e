use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};
use strum::IntoEnumIterator;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::state::{AppState, FormField};
use crate::mixer::features::Attribute;
use crate::mixer::{Mood, SelectionMode};
use super::super::theme::*;

/// The right-most part of `text` that fits in `width` columns, so the end
/// of a long link stays visible while typing.
pub fn visible_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &text[start..]
}

fn field_block(field: FormField, focus: FormField) -> Block<'static> {
    let focused = field == focus;
    Block::default()
        .title(Span::styled(
            format!(" {} ", field.label()),
            if focused { title_style() } else { dim_style() },
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(focused))
        .style(normal_style().bg(BG_ALT))
}

fn render_text_field(f: &mut Frame, area: Rect, state: &AppState, field: FormField, value: &str, placeholder: &str) {
    let focused = state.form.focus == field;
    let block = field_block(field, state.form.focus);
    let inner_width = block.inner(area).width.saturating_sub(2) as usize;

    let line = if value.is_empty() && !focused {
        Line::from(Span::styled(format!(" {placeholder}"), muted_style()))
    } else {
        let cursor = if focused && (state.tick / 6) % 2 == 0 { "│" } else { " " };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(visible_tail(value, inner_width).to_string(), accent_style()),
            Span::styled(cursor, title_style()),
        ])
    };
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn choice_line<'a>(options: impl Iterator<Item = (String, bool)>) -> Line<'a> {
    let mut spans = vec![Span::raw(" ")];
    for (label, active) in options {
        let style = if active { selected_style() } else { dim_style() };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

pub fn render_form(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // playlist
            Constraint::Length(3), // name
            Constraint::Length(4), // mode
            Constraint::Length(3), // visibility
            Constraint::Length(3), // submit
            Constraint::Min(0),
        ])
        .split(area);

    let form = &state.form;
    render_text_field(
        f,
        chunks[0],
        state,
        FormField::Playlist,
        &form.playlist,
        "https://open.spotify.com/playlist/…",
    );

    let default_name = match form.mood {
        Some(mood) => format!("Mood Mix: {mood}"),
        None => "Mood Mix: <mood>".to_string(),
    };
    render_text_field(f, chunks[1], state, FormField::Name, &form.name, &default_name);

    let modes = SelectionMode::iter().map(|m| (m.to_string(), m == form.mode));
    let mode_text = vec![choice_line(modes), Line::from(Span::styled(format!("  {}", form.mode.describe()), muted_style()))];
    f.render_widget(
        Paragraph::new(mode_text).block(field_block(FormField::Mode, form.focus)),
        chunks[2],
    );

    let visibility = [("private".to_string(), !form.public), ("public".to_string(), form.public)];
    f.render_widget(
        Paragraph::new(choice_line(visibility.into_iter())).block(field_block(FormField::Visibility, form.focus)),
        chunks[3],
    );

    let submit_focused = form.focus == FormField::Submit;
    let button = if state.is_running() {
        Line::from(Span::styled(format!(" {} Mixing…", state.spinner()), accent_style()))
    } else if submit_focused {
        Line::from(Span::styled(" ▶ Create playlist ", header_style()))
    } else {
        Line::from(Span::styled(" ▶ Create playlist  (Enter) ", dim_style()))
    };
    f.render_widget(
        Paragraph::new(button).block(field_block(FormField::Submit, form.focus)),
        chunks[4],
    );
}

/// Full-bar value for a target gauge.
fn gauge_max(attr: Attribute) -> f64 {
    match attr {
        Attribute::Tempo => 220.0,
        _ => 1.0,
    }
}

fn gauge(value: f64, max: f64, width: usize) -> String {
    let filled = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_moods(f: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.form.focus == FormField::Mood;
    let items: Vec<ListItem> = Mood::iter()
        .enumerate()
        .map(|(i, mood)| {
            let is_sel = state.form.mood == Some(mood);
            let marker = if is_sel { "● " } else { "  " };
            let name_style = if is_sel {
                Style::default().fg(mood_color(mood))
            } else {
                normal_style()
            };
            let mut lines = vec![Line::from(vec![
                Span::styled(marker, Style::default().fg(mood_color(mood))),
                Span::styled(format!("[{}] ", i + 1), muted_style()),
                Span::styled(mood.to_string(), name_style),
                Span::styled(format!("  {}", mood.blurb()), muted_style()),
            ])];
            if is_sel {
                for (attr, value) in mood.target() {
                    lines.push(Line::from(vec![
                        Span::styled(format!("      {:<17}", attr.to_string()), dim_style()),
                        Span::styled(gauge(*value, gauge_max(*attr), 12), Style::default().fg(mood_color(mood))),
                        Span::styled(format!(" {value}"), muted_style()),
                    ]));
                }
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(
                " Mood ",
                if focused { title_style() } else { dim_style() },
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style(focused))
            .style(normal_style().bg(BG)),
    );
    f.render_widget(list, area);
}
