//! Dark theme palette

use ratatui::style::Color;

pub const BG: Color = Color::Rgb(0x14, 0x13, 0x13);
pub const SURFACE: Color = Color::Rgb(0x20, 0x1f, 0x20);
pub const SURFACE_HIGH: Color = Color::Rgb(0x2b, 0x2a, 0x2a);

pub const ON_SURFACE: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const OUTLINE: Color = Color::Rgb(0x94, 0x8f, 0x94);

pub const PRIMARY: Color = Color::Rgb(0xcb, 0xc4, 0xcb);
pub const PRIMARY_CONTAINER: Color = Color::Rgb(0x2d, 0x2a, 0x2f);

pub const ERROR: Color = Color::Rgb(0xff, 0xb4, 0xab);
pub const WARNING: Color = Color::Rgb(0xff, 0xd9, 0x66);
