//! Quiz Style System
//!
//! Semantic colors for question cards and status lines, plus glyphs with
//! plain-ASCII fallbacks.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::{Colorize, CustomColor};

/// When true, all glyphs use plain ASCII instead of Unicode.
static ASCII_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_ascii_mode(enabled: bool) {
    ASCII_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_ascii_mode() -> bool {
    ASCII_MODE.load(Ordering::Relaxed)
}

pub struct Palette;

impl Palette {
    pub const AMBER: CustomColor = CustomColor {
        r: 212,
        g: 163,
        b: 115,
    }; // #D4A373 - titles
    pub const BLOOM: CustomColor = CustomColor {
        r: 144,
        g: 190,
        b: 109,
    }; // correct
    pub const WILT: CustomColor = CustomColor {
        r: 188,
        g: 108,
        b: 37,
    }; // notices
    pub const FROST: CustomColor = CustomColor {
        r: 200,
        g: 80,
        b: 80,
    }; // incorrect / errors
    pub const STONE: CustomColor = CustomColor {
        r: 128,
        g: 128,
        b: 128,
    }; // secondary text
}

/// Semantic styling for quiz output
pub trait QuizStyle {
    fn title(self) -> colored::ColoredString;
    fn correct(self) -> colored::ColoredString;
    fn incorrect(self) -> colored::ColoredString;
    fn notice(self) -> colored::ColoredString;
    fn muted(self) -> colored::ColoredString;
    fn option_key(self) -> colored::ColoredString;
}

impl QuizStyle for &str {
    fn title(self) -> colored::ColoredString {
        self.custom_color(Palette::AMBER).bold()
    }

    fn correct(self) -> colored::ColoredString {
        self.custom_color(Palette::BLOOM).bold()
    }

    fn incorrect(self) -> colored::ColoredString {
        self.custom_color(Palette::FROST)
    }

    fn notice(self) -> colored::ColoredString {
        self.custom_color(Palette::WILT)
    }

    fn muted(self) -> colored::ColoredString {
        self.custom_color(Palette::STONE)
    }

    fn option_key(self) -> colored::ColoredString {
        self.bold()
    }
}

impl QuizStyle for String {
    fn title(self) -> colored::ColoredString {
        self.as_str().title()
    }

    fn correct(self) -> colored::ColoredString {
        self.as_str().correct()
    }

    fn incorrect(self) -> colored::ColoredString {
        self.as_str().incorrect()
    }

    fn notice(self) -> colored::ColoredString {
        self.as_str().notice()
    }

    fn muted(self) -> colored::ColoredString {
        self.as_str().muted()
    }

    fn option_key(self) -> colored::ColoredString {
        self.as_str().option_key()
    }
}

pub struct Glyphs;

impl Glyphs {
    pub fn check() -> &'static str {
        if is_ascii_mode() {
            "[ok]"
        } else {
            "✔"
        }
    }

    pub fn cross() -> &'static str {
        if is_ascii_mode() {
            "[x]"
        } else {
            "✕"
        }
    }

    pub fn warning() -> &'static str {
        if is_ascii_mode() {
            "!"
        } else {
            "⚠"
        }
    }

    pub fn document() -> &'static str {
        if is_ascii_mode() {
            "[pdf]"
        } else {
            "📄"
        }
    }
}
