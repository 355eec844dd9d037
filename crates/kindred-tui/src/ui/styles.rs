use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(224, 72, 112);
pub const ACCENT: Color = Color::Rgb(240, 176, 96);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const BACKGROUND: Color = Color::Rgb(24, 24, 32);

/// Skeleton block colour at full opacity
const SKELETON_BASE: (u8, u8, u8) = (200, 200, 210);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn splash_style() -> Style {
    Style::default().bg(PRIMARY).fg(Color::White)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

/// Terminals have no alpha, so blend the skeleton colour over the background.
pub fn skeleton_color(opacity: f32) -> Color {
    let a = opacity.clamp(0.0, 1.0);
    let blend = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
    let Color::Rgb(br, bg, bb) = BACKGROUND else {
        return Color::Gray;
    };
    Color::Rgb(
        blend(SKELETON_BASE.0, br),
        blend(SKELETON_BASE.1, bg),
        blend(SKELETON_BASE.2, bb),
    )
}

pub fn skeleton_style(opacity: f32) -> Style {
    Style::default().bg(skeleton_color(opacity))
}
