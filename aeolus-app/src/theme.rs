use aeolus_core::Mode;
use ratatui::style::Color;

/// Resolved palette for one appearance mode. Passed into every draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: Mode,
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub muted: Color,
    pub card: Color,
    pub card_inset: Color,
    pub card_text: Color,
    pub stat_card: Color,
    pub error: Color,
}

impl Theme {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Light => Self {
                mode,
                background: Color::Rgb(0xFF, 0xFF, 0xFF),
                panel: Color::Rgb(0xF0, 0xF0, 0xF0),
                text: Color::Black,
                muted: Color::Gray,
                card: Color::Rgb(0x40, 0x7B, 0xFF),
                card_inset: Color::Rgb(0x6B, 0x99, 0xFF),
                card_text: Color::White,
                stat_card: Color::Rgb(0xFF, 0xFF, 0xFF),
                error: Color::Red,
            },
            Mode::Dark => Self {
                mode,
                background: Color::Rgb(0x1A, 0x1A, 0x1A),
                panel: Color::Rgb(0x24, 0x24, 0x24),
                text: Color::Rgb(0xDC, 0xE4, 0xEE),
                muted: Color::DarkGray,
                card: Color::Rgb(0x1F, 0x3B, 0x7A),
                card_inset: Color::Rgb(0x2C, 0x52, 0xA3),
                card_text: Color::Rgb(0xF2, 0xF2, 0xF2),
                stat_card: Color::Rgb(0x2E, 0x2E, 0x2E),
                error: Color::LightRed,
            },
        }
    }
}
