//! Ayu color theme and styling for regform CLI output.
//!
//! Uses the Ayu Dark color palette.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only things that need attention get color: lint errors and warnings,
//! skipped formula steps, and dynamic (computed) values.

use owo_colors::OwoColorize;
use regform_core::enums::ValueType;
use regform_core::validation::{Diagnostic, Severity};

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue
const COMPUTED: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff - purple

// General icons
pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_WARN: &str = "\u{26A0}"; // warning sign
pub const ICON_FAIL: &str = "\u{2716}"; // heavy multiplication x

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

// ---------------------------------------------------------------------------
// Domain renderers
// ---------------------------------------------------------------------------

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

/// Icon for a lint severity.
pub fn render_severity_icon(severity: Severity) -> String {
    match severity {
        Severity::Error => color_str(ICON_FAIL, FAIL),
        Severity::Warning => color_str(ICON_WARN, WARN),
    }
}

/// One lint finding as `<icon> <field>: <message>`.
pub fn render_diagnostic(diag: &Diagnostic) -> String {
    let field = if diag.field.is_empty() {
        render_muted("(unnamed)")
    } else {
        render_accent(&diag.field)
    };
    let message = match diag.severity {
        Severity::Error => render_fail(&diag.message),
        Severity::Warning => render_warn(&diag.message),
    };
    format!("{} {}: {}", render_severity_icon(diag.severity), field, message)
}

/// Value type label; computed fields stand out, fixed ones are muted.
pub fn render_value_type(value_type: &ValueType) -> String {
    let s = value_type.as_str();
    match value_type {
        ValueType::Dynamic => color_str(s, COMPUTED),
        ValueType::Fixed => render_muted(s),
        ValueType::Custom(_) => render_fail(s),
        ValueType::UserInput => s.to_string(),
    }
}

/// A computed amount, highlighted as a dynamic value.
pub fn render_computed(s: &str) -> String {
    color_bold_str(s, COMPUTED)
}
