//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Cross used in failure lines
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output, colored only when stdout supports it
pub trait Stylize: Display + Sized {
    /// Bold, for headings
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
    }

    /// Dimmed, for secondary detail
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
    }

    /// Cyan, for names and numbers
    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string()
    }

    /// Green
    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green()).to_string()
    }

    /// Yellow
    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string()
    }

    /// Red, checked against stderr
    fn error(&self) -> String {
        self.if_supports_color(Stream::Stderr, |t| t.red()).to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
}

/// Spinner style for network calls
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
