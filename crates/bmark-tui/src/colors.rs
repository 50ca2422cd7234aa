//! Dark theme colors for the palette overlay.

use ratatui::style::Color;

pub const SURFACE: Color = Color::Rgb(0x1b, 0x1b, 0x1f);
pub const SURFACE_HIGH: Color = Color::Rgb(0x2a, 0x2a, 0x30);

pub const ON_SURFACE: Color = Color::Rgb(0xe4, 0xe1, 0xe6);
pub const SUBTEXT: Color = Color::Rgb(0x90, 0x8f, 0x9a);
pub const OUTLINE: Color = Color::Rgb(0x46, 0x46, 0x4f);

pub const ACCENT: Color = Color::Rgb(0x8a, 0xb4, 0xf8);
pub const WEB_SEARCH: Color = Color::Rgb(0x81, 0xc9, 0x95);
