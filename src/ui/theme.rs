//! Colour palette and text styles used across the UI.

use image::Rgb;
use ratatui::style::{Color, Modifier, Style};

/// Palette and styles shared by every widget.
pub struct Theme;

impl Theme {
    // ── pixels ─────────────────────────────────────────────────
    pub const BACKGROUND: Rgb<u8> = Rgb([18, 18, 22]);
    pub const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
    pub const BACKDROP: Rgb<u8> = Rgb([0, 0, 0]);
    pub const PLACEHOLDER: Rgb<u8> = Rgb([40, 40, 48]);

    /// Card fill for grid item `id`.  Hues walk the wheel so neighbours differ.
    pub fn card_colour(id: usize) -> Rgb<u8> {
        const CARDS: [Rgb<u8>; 6] = [
            Rgb([70, 110, 160]),
            Rgb([160, 90, 80]),
            Rgb([90, 140, 90]),
            Rgb([150, 120, 60]),
            Rgb([110, 80, 150]),
            Rgb([60, 130, 140]),
        ];
        CARDS[id % CARDS.len()]
    }

    // ── text ───────────────────────────────────────────────────
    pub fn card_label_style(card: Rgb<u8>) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(to_color(card))
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn state_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn status_message_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::Yellow)
    }
}

pub fn to_color(rgb: Rgb<u8>) -> Color {
    let Rgb([r, g, b]) = rgb;
    Color::Rgb(r, g, b)
}
