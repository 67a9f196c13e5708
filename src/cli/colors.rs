//! To maintain a theme of colors, colors live here as constants so every
//! message printed by the binary looks the same.
//!
//! - REPORT_TEAL: Main Color
//! - REPORT_AMBER: Warnings and mismatches

use colored::Color;

pub(crate) const REPORT_TEAL: Color = Color::TrueColor {
    r: 38,
    g: 166,
    b: 154,
};

pub(crate) const REPORT_AMBER: Color = Color::TrueColor {
    r: 255,
    g: 179,
    b: 0,
};
