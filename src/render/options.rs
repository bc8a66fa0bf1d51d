//! Rendering options and configuration.

/// Options for rendering a reconstructed document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix for image paths in output (e.g., "./images/")
    pub image_path_prefix: String,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Emit inline `style` attributes in HTML output
    pub inline_styles: bool,

    /// Start the output with the document identifier as a top-level heading
    pub include_document_title: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable or disable inline HTML styles.
    pub fn with_inline_styles(mut self, inline: bool) -> Self {
        self.inline_styles = inline;
        self
    }

    /// Enable or disable the document title heading.
    pub fn with_document_title(mut self, include: bool) -> Self {
        self.include_document_title = include;
        self
    }

    /// Full path of an image reference in rendered output.
    pub fn image_path(&self, image_ref: &str) -> String {
        format!("{}{}", self.image_path_prefix, image_ref)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_path_prefix: String::new(),
            escape_special_chars: true,
            inline_styles: true,
            include_document_title: false,
        }
    }
}
