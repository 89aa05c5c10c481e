use ratatui::style::{Color, Modifier, Style};

use crate::mixer::Mood;

// ─── Color Palette ───────────────────────────────────────────────────────────
pub const BG:          Color = Color::Rgb(16,  16,  20);
pub const BG_ALT:      Color = Color::Rgb(24,  24,  32);
pub const SURFACE_SEL: Color = Color::Rgb(36,  52,  44);

pub const PRIMARY:     Color = Color::Rgb(30,  215, 96);  // spotify green
pub const ACCENT:      Color = Color::Rgb(255, 180, 84);  // amber
pub const LINK:        Color = Color::Rgb(110, 170, 255);

pub const TEXT:        Color = Color::Rgb(225, 225, 230);
pub const TEXT_DIM:    Color = Color::Rgb(150, 150, 160);
pub const TEXT_MUTED:  Color = Color::Rgb(90,  90,  105);

pub const BORDER:      Color = Color::Rgb(55,  55,  70);
pub const BORDER_FOCUSED: Color = PRIMARY;

pub const SUCCESS:     Color = PRIMARY;
pub const ERROR:       Color = Color::Rgb(255, 95,  95);

/// Tint used for a mood's name and gauge bars.
pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Happy => Color::Rgb(255, 214, 10),
        Mood::Chill => Color::Rgb(120, 200, 230),
        Mood::Energetic => Color::Rgb(255, 140, 0),
        Mood::Workout => Color::Rgb(255, 70, 70),
        Mood::Focus => Color::Rgb(150, 130, 255),
        Mood::Party => Color::Rgb(240, 90, 200),
        Mood::Sad => Color::Rgb(100, 120, 170),
        Mood::Romantic => Color::Rgb(255, 120, 150),
    }
}

// ─── Styles ──────────────────────────────────────────────────────────────────
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn accent_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(SURFACE_SEL)
        .fg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn muted_style() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn link_style() -> Style {
    Style::default().fg(LINK).add_modifier(Modifier::UNDERLINED)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUSED)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default()
        .fg(BG)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}
