//! Theme definitions for the type-ahead screen.
//!
//! Muted base colors with a single accent; status colors are reserved for the
//! one-line footer so result cards stay calm.

use ratatui::style::{Color, Modifier, Style};

pub mod colors {
    use ratatui::style::Color;

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deep background - primary canvas color
    pub const BG_DEEP: Color = Color::Rgb(26, 27, 38); // #1a1b26

    /// Elevated surface - cards
    pub const BG_SURFACE: Color = Color::Rgb(36, 40, 59); // #24283b

    /// Selected card
    pub const BG_HIGHLIGHT: Color = Color::Rgb(41, 46, 66); // #292e42

    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261

    /// Border of the focused input
    pub const BORDER_FOCUS: Color = Color::Rgb(125, 145, 200); // #7d91c8

    // ═══════════════════════════════════════════════════════════════════════════
    // TEXT COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5

    pub const TEXT_SECONDARY: Color = Color::Rgb(169, 177, 214); // #a9b1d6

    /// Muted text - hints, placeholders
    /// Lightened from Tokyo Night #565f89 to meet WCAG AA-large (3:1) contrast
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #696e9e

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCENT + STATUS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7

    pub const STATUS_WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68

    pub const STATUS_ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e
}

#[derive(Clone, Copy, Debug)]
pub struct ThemePalette {
    pub accent: Color,
    pub bg: Color,
    pub fg: Color,
    pub fg_secondary: Color,
    pub hint: Color,
    pub border: Color,
    pub warning: Color,
    pub error: Color,
    pub stripe_even: Color,
    pub stripe_odd: Color,
}

impl ThemePalette {
    /// Light theme
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(47, 107, 231),       // Rich blue
            bg: Color::Rgb(250, 250, 252),          // Off-white
            fg: Color::Rgb(36, 41, 46),             // Near-black
            fg_secondary: Color::Rgb(68, 76, 86),   // Dark gray
            hint: Color::Rgb(125, 134, 144),        // Medium gray
            border: Color::Rgb(216, 222, 228),      // Border gray
            warning: Color::Rgb(177, 133, 41),      // Amber
            error: Color::Rgb(207, 34, 46),         // Red
            stripe_even: Color::Rgb(250, 250, 252), // Same as bg
            stripe_odd: Color::Rgb(240, 241, 245),  // Slightly darker
        }
    }

    /// Dark theme
    pub fn dark() -> Self {
        Self {
            accent: colors::ACCENT_PRIMARY,
            bg: colors::BG_DEEP,
            fg: colors::TEXT_PRIMARY,
            fg_secondary: colors::TEXT_SECONDARY,
            hint: colors::TEXT_MUTED,
            border: colors::BORDER,
            warning: colors::STATUS_WARNING,
            error: colors::STATUS_ERROR,
            stripe_even: colors::BG_DEEP,
            stripe_odd: Color::Rgb(30, 32, 48), // #1e2030
        }
    }

    /// Whole-screen background and default text color
    pub fn canvas_style(self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }

    /// Card title - accent colored, bold
    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn value_style(self) -> Style {
        Style::default().fg(self.fg_secondary)
    }

    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default().fg(colors::BORDER_FOCUS)
    }

    pub fn loading_style(self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn failure_hint_style(self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::DIM)
    }

    pub fn selected_style(self) -> Style {
        Style::default()
            .bg(colors::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Zebra background for the card at `idx`.
    pub fn stripe(self, idx: usize) -> Style {
        let bg = if idx % 2 == 0 {
            self.stripe_even
        } else {
            self.stripe_odd
        };
        Style::default().bg(bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripes_alternate() {
        let palette = ThemePalette::dark();
        assert_eq!(palette.stripe(0), palette.stripe(2));
        assert_ne!(palette.stripe(0), palette.stripe(1));
    }

    #[test]
    fn light_and_dark_differ_in_background() {
        assert_ne!(ThemePalette::light().bg, ThemePalette::dark().bg);
    }

    #[test]
    fn title_is_bold_accent() {
        let palette = ThemePalette::light();
        let style = palette.title();
        assert_eq!(style.fg, Some(palette.accent));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
