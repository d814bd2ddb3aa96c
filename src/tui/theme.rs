//! Color theme for the dashboard - ANSI colors for terminal compatibility

use ratatui::style::{Color, Modifier, Style};

use crate::memory::MemoryCategory;

pub struct Theme;

impl Theme {
    pub const CYAN: Color = Color::Cyan;
    pub const GREEN: Color = Color::Green;
    pub const YELLOW: Color = Color::Yellow;
    pub const RED: Color = Color::Red;
    pub const BLUE: Color = Color::Blue;
    pub const MAGENTA: Color = Color::Magenta;
    pub const DARK_GRAY: Color = Color::DarkGray;

    pub fn title() -> Style {
        Style::default().fg(Self::CYAN).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default()
    }

    pub fn bold() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::CYAN)
    }

    /// Accent color of a category badge
    pub fn category_color(category: MemoryCategory) -> Color {
        match category {
            MemoryCategory::DailyNotes => Self::BLUE,
            MemoryCategory::BrainDumps => Self::MAGENTA,
            MemoryCategory::ConversationLogs => Self::YELLOW,
            MemoryCategory::ExtractedDocuments => Self::GREEN,
        }
    }

    pub fn badge(category: MemoryCategory) -> Style {
        Style::default()
            .bg(Self::category_color(category))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn chip() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }

    pub fn chip_active() -> Style {
        Style::default()
            .bg(Self::CYAN)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }

    pub fn stat_value() -> Style {
        Style::default().fg(Self::CYAN).add_modifier(Modifier::BOLD)
    }

    // Key hints
    pub fn key() -> Style {
        Style::default().fg(Self::CYAN).add_modifier(Modifier::BOLD)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Self::DARK_GRAY)
    }
}
