//! Error message formatting with actionable suggestions.

use std::error::Error;

use gallery_core::error::GalleryError;

use super::colors::ColorSupport;

/// Renders a [`GalleryError`] as `error:`, optional `help:` and its
/// `caused by:` chain
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect())
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with its suggestion and source chain
    pub fn format_error(&self, error: &GalleryError) -> String {
        let mut output = format!("{}: {}", self.colors.red("error"), error);

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("\n{}: {}", self.colors.dim("help"), suggestion));
        }

        let mut source = error.source();
        while let Some(cause) = source {
            output.push_str(&format!("\n{}: {}", self.colors.dim("caused by"), cause));
            source = cause.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
