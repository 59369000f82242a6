//! Catppuccin palettes for the two theme modes
//!
//! Dark maps to Mocha, light maps to Latte.

use aether_cli::shell::ThemeMode;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Color,
    pub mantle: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub text: Color,
    pub subtext0: Color,
    pub mauve: Color,
    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub peach: Color,
    pub red: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::mocha(),
            ThemeMode::Light => Self::latte(),
        }
    }

    fn mocha() -> Self {
        Self {
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
            mantle: Color::Rgb(0x18, 0x18, 0x25),
            surface0: Color::Rgb(0x31, 0x32, 0x44),
            surface1: Color::Rgb(0x45, 0x47, 0x5a),
            overlay0: Color::Rgb(0x6c, 0x70, 0x86),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext0: Color::Rgb(0xa6, 0xad, 0xc8),
            mauve: Color::Rgb(0xcb, 0xa6, 0xf7),
            blue: Color::Rgb(0x89, 0xb4, 0xfa),
            green: Color::Rgb(0xa6, 0xe3, 0xa1),
            yellow: Color::Rgb(0xf9, 0xe2, 0xaf),
            peach: Color::Rgb(0xfa, 0xb3, 0x87),
            red: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }

    fn latte() -> Self {
        Self {
            base: Color::Rgb(0xef, 0xf1, 0xf5),
            mantle: Color::Rgb(0xe6, 0xe9, 0xef),
            surface0: Color::Rgb(0xcc, 0xd0, 0xda),
            surface1: Color::Rgb(0xbc, 0xc0, 0xcc),
            overlay0: Color::Rgb(0x9c, 0xa0, 0xb0),
            text: Color::Rgb(0x4c, 0x4f, 0x69),
            subtext0: Color::Rgb(0x6c, 0x6f, 0x85),
            mauve: Color::Rgb(0x88, 0x39, 0xef),
            blue: Color::Rgb(0x1e, 0x66, 0xf5),
            green: Color::Rgb(0x40, 0xa0, 0x2b),
            yellow: Color::Rgb(0xdf, 0x8e, 0x1d),
            peach: Color::Rgb(0xfe, 0x64, 0x0b),
            red: Color::Rgb(0xd2, 0x0f, 0x39),
        }
    }

    pub fn screen(&self) -> Style {
        Style::default().fg(self.text).bg(self.base)
    }

    pub fn bar(&self) -> Style {
        Style::default().fg(self.subtext0).bg(self.mantle)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.mauve)
        } else {
            Style::default().fg(self.surface1)
        }
    }

    pub fn highlight(&self) -> Style {
        Style::default().bg(self.surface0).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.overlay0)
    }
}
