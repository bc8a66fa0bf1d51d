//! Layout options and configuration.
//!
//! Every threshold the pipeline consults lives here so classification policy
//! can be tuned without touching the stages themselves.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for reconstructing a document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Bottom fraction of the page treated as footer
    pub footer_fraction: f32,

    /// Top fraction of the page where running headers are expected
    pub header_band_fraction: f32,

    /// Maximum distance between a block's vertical center and a row's running center
    pub y_tolerance: f32,

    /// Column positions closer than this collapse into one column
    pub x_gap_tolerance: f32,

    /// Rows whose largest font reaches this size are title candidates
    pub title_font_size: f32,

    /// Table rows whose largest font exceeds this size are flagged as header rows
    pub table_header_font_size: f32,

    /// Length at which normalized header keys are truncated
    pub header_key_max_len: usize,

    /// Texts at least this long are never classified as TOC by token density
    pub toc_max_chars: usize,

    /// Case-insensitive keywords that mark a table of contents
    pub toc_keywords: Vec<String>,

    /// Rows with this many characters or fewer are dropped
    pub min_row_chars: usize,

    /// Title of the implicit section opened by leading text or images
    pub intro_title: String,

    /// Title of the implicit section opened by a leading table
    pub table_title: String,

    /// What to do with pages that cannot be laid out
    pub error_mode: ErrorMode,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the footer fraction.
    pub fn with_footer_fraction(mut self, fraction: f32) -> Self {
        self.footer_fraction = fraction;
        self
    }

    /// Set the header band fraction.
    pub fn with_header_band_fraction(mut self, fraction: f32) -> Self {
        self.header_band_fraction = fraction;
        self
    }

    /// Set the row clustering tolerance.
    pub fn with_y_tolerance(mut self, tolerance: f32) -> Self {
        self.y_tolerance = tolerance;
        self
    }

    /// Set the column gap tolerance.
    pub fn with_x_gap_tolerance(mut self, tolerance: f32) -> Self {
        self.x_gap_tolerance = tolerance;
        self
    }

    /// Set the title font size threshold.
    pub fn with_title_font_size(mut self, size: f32) -> Self {
        self.title_font_size = size;
        self
    }

    /// Set the table header font size threshold.
    pub fn with_table_header_font_size(mut self, size: f32) -> Self {
        self.table_header_font_size = size;
        self
    }

    /// Replace the TOC keyword set.
    pub fn with_toc_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.toc_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on unusable pages instead of skipping them.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        let fraction_ok = |v: f32| v.is_finite() && (0.0..1.0).contains(&v);
        if !fraction_ok(self.footer_fraction) {
            return Err(Error::InvalidOptions(format!(
                "footer_fraction must be in [0, 1), got {}",
                self.footer_fraction
            )));
        }
        if !fraction_ok(self.header_band_fraction) {
            return Err(Error::InvalidOptions(format!(
                "header_band_fraction must be in [0, 1), got {}",
                self.header_band_fraction
            )));
        }
        for (name, value) in [
            ("y_tolerance", self.y_tolerance),
            ("x_gap_tolerance", self.x_gap_tolerance),
            ("title_font_size", self.title_font_size),
            ("table_header_font_size", self.table_header_font_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.header_key_max_len == 0 {
            return Err(Error::InvalidOptions(
                "header_key_max_len must be positive".to_string(),
            ));
        }
        if self.intro_title.trim().is_empty() || self.table_title.trim().is_empty() {
            return Err(Error::InvalidOptions(
                "implicit section titles must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            footer_fraction: 0.15,
            header_band_fraction: 0.18,
            y_tolerance: 3.0,
            x_gap_tolerance: 8.0,
            title_font_size: 12.0,
            table_header_font_size: 10.0,
            header_key_max_len: 120,
            toc_max_chars: 200,
            toc_keywords: ["sommaire", "table des matières", "table of contents", "contents"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_row_chars: 2,
            intro_title: "Introduction".to_string(),
            table_title: "Tableau".to_string(),
            error_mode: ErrorMode::Lenient,
        }
    }
}

/// Error handling mode for unusable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail the document on an unusable page
    Strict,
    /// Skip unusable pages and continue
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.footer_fraction, 0.15);
        assert_eq!(options.header_band_fraction, 0.18);
        assert_eq!(options.y_tolerance, 3.0);
        assert_eq!(options.x_gap_tolerance, 8.0);
        assert_eq!(options.title_font_size, 12.0);
        assert_eq!(options.table_header_font_size, 10.0);
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_y_tolerance(5.0)
            .with_x_gap_tolerance(12.0)
            .with_title_font_size(14.0)
            .strict();

        assert_eq!(options.y_tolerance, 5.0);
        assert_eq!(options.x_gap_tolerance, 12.0);
        assert_eq!(options.title_font_size, 14.0);
        assert_eq!(options.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_from_json_partial() {
        let options = LayoutOptions::from_json(r#"{"y_tolerance": 4.5, "error_mode": "strict"}"#)
            .unwrap();
        assert_eq!(options.y_tolerance, 4.5);
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.x_gap_tolerance, 8.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(LayoutOptions::new().with_footer_fraction(1.0).validate().is_err());
        assert!(LayoutOptions::new().with_header_band_fraction(-0.1).validate().is_err());
        assert!(LayoutOptions::new().with_y_tolerance(f32::NAN).validate().is_err());
        assert!(matches!(
            LayoutOptions::from_json(r#"{"intro_title": "  "}"#),
            Err(Error::InvalidOptions(_))
        ));
    }
}
