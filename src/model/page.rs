//! Page-level input types.

use super::BBox;
use serde::{Deserialize, Serialize};

/// A single page as supplied by the document-reading component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, 0 if the source did not number it)
    #[serde(default)]
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Positioned text blocks
    #[serde(default, alias = "textBlocks")]
    pub text_blocks: Vec<TextBlock>,

    /// Positioned image blocks
    #[serde(default, alias = "imageBlocks")]
    pub image_blocks: Vec<ImageBlock>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            text_blocks: Vec::new(),
            image_blocks: Vec::new(),
        }
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Add a text block and return self.
    pub fn with_text(mut self, bbox: BBox, text: impl Into<String>, max_font_size: f32) -> Self {
        self.text_blocks.push(TextBlock {
            bbox: Some(bbox),
            text: text.into(),
            max_font_size,
        });
        self
    }

    /// Add an image block and return self.
    pub fn with_image(mut self, bbox: BBox, image_ref: impl Into<String>) -> Self {
        self.image_blocks.push(ImageBlock {
            bbox: Some(bbox),
            image_ref: image_ref.into(),
        });
        self
    }

    /// Whether the page dimensions allow band computations.
    pub fn has_usable_dimensions(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Collect the usable blocks of this page, text first, then images.
    ///
    /// Blocks with a missing or degenerate bounding box and text blocks whose
    /// text is blank are skipped.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.text_blocks.len() + self.image_blocks.len());
        let mut skipped = 0usize;

        for tb in &self.text_blocks {
            let text = tb.text.trim();
            match tb.bbox {
                Some(bbox) if !bbox.is_degenerate() && !text.is_empty() => {
                    blocks.push(Block {
                        bbox,
                        text: text.to_string(),
                        max_font_size: tb.max_font_size,
                        kind: BlockKind::Text,
                    });
                }
                _ => skipped += 1,
            }
        }

        for ib in &self.image_blocks {
            match ib.bbox {
                Some(bbox) if !bbox.is_degenerate() => {
                    blocks.push(Block {
                        bbox,
                        text: String::new(),
                        max_font_size: 0.0,
                        kind: BlockKind::Image(ib.image_ref.clone()),
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("Page {}: skipped {} unusable blocks", self.number, skipped);
        }

        blocks
    }
}

/// A positioned text block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding box (`None` when the source could not position it)
    #[serde(default)]
    pub bbox: Option<BBox>,

    /// Block text; lines are separated by `\n`
    #[serde(default)]
    pub text: String,

    /// Largest font size among the block's spans
    #[serde(default, alias = "maxFontSize")]
    pub max_font_size: f32,
}

/// A positioned image block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Bounding box (`None` when the source could not position it)
    #[serde(default)]
    pub bbox: Option<BBox>,

    /// Opaque reference to the image data
    #[serde(alias = "imageRef")]
    pub image_ref: String,
}

/// What a validated block carries.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// A text primitive
    Text,
    /// An image primitive with its opaque reference
    Image(String),
}

/// A validated, positioned primitive ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Bounding box (never degenerate)
    pub bbox: BBox,
    /// Trimmed text (empty for images)
    pub text: String,
    /// Largest font size in the block
    pub max_font_size: f32,
    /// Text or image
    pub kind: BlockKind,
}

impl Block {
    /// Create a text block.
    pub fn text(bbox: BBox, text: impl Into<String>, max_font_size: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            max_font_size,
            kind: BlockKind::Text,
        }
    }

    /// Create an image block.
    pub fn image(bbox: BBox, image_ref: impl Into<String>) -> Self {
        Self {
            bbox,
            text: String::new(),
            max_font_size: 0.0,
            kind: BlockKind::Image(image_ref.into()),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, BlockKind::Text)
    }

    /// Block text on a single line, as used in rows and table cells.
    pub fn flat_text(&self) -> String {
        self.text.replace('\n', " ").trim().to_string()
    }
}
