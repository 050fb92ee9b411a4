//! Terminal display styles.
//!
//! Only named ANSI colors are used so output follows the user's terminal
//! palette. Emphasis comes from `Attribute::Dim` / `Attribute::Bold`, not
//! bright variants.

use crossterm::style::{Attribute, Color, ContentStyle};

pub fn dim() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Dim.into(),
        ..Default::default()
    }
}

pub fn heading() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn error() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Red),
        ..Default::default()
    }
}

pub fn error_heading() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Red),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn result_line() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Green),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn prompt_style() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Cyan),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}
