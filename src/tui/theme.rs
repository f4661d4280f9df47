//! Light and dark palettes.

use ratatui::style::{Color, Modifier, Style};

/// Colors used across the widgets for one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub focus_border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub error: Color,
    pub success: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        background: Color::White,
        text: Color::Black,
        muted: Color::Gray,
        accent: Color::Blue,
        border: Color::Gray,
        focus_border: Color::Blue,
        header_bg: Color::Blue,
        header_fg: Color::White,
        error: Color::Red,
        success: Color::Green,
        selection_bg: Color::LightBlue,
        selection_fg: Color::Black,
    };

    pub const DARK: Theme = Theme {
        background: Color::Black,
        text: Color::White,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        border: Color::DarkGray,
        focus_border: Color::Cyan,
        header_bg: Color::DarkGray,
        header_fg: Color::White,
        error: Color::LightRed,
        success: Color::LightGreen,
        selection_bg: Color::Blue,
        selection_fg: Color::White,
    };

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    /// Base style for panel contents.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.focus_border
        } else {
            self.border
        })
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_mode() {
        assert_eq!(Theme::for_mode(true), Theme::DARK);
        assert_eq!(Theme::for_mode(false), Theme::LIGHT);
        assert_ne!(Theme::DARK.background, Theme::LIGHT.background);
    }
}
