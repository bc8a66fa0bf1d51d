//! Section and content item types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A titled run of content in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section title as it appeared on the page
    pub title: String,

    /// Content in top-to-bottom, left-to-right order
    pub content: Vec<ContentItem>,
}

impl Section {
    /// Create a new section with no content.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Append a content item.
    pub fn push(&mut self, item: ContentItem) {
        self.content.push(item);
    }

    /// Check if the section has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterate over the section's paragraph texts.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|item| match item {
            ContentItem::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Iterate over the section's tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|item| match item {
            ContentItem::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Get plain text content of the section, title first.
    pub fn plain_text(&self) -> String {
        let mut parts = vec![self.title.clone()];
        parts.extend(self.content.iter().filter_map(|item| match item {
            ContentItem::Paragraph(text) => Some(text.clone()),
            ContentItem::Table(table) => Some(table.plain_text()),
            ContentItem::Image(_) => None,
        }));
        parts.join("\n")
    }
}

/// One piece of section content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ContentItem {
    /// A paragraph built from one text row
    Paragraph(String),

    /// A detected table
    Table(Table),

    /// An image with its size relative to the page
    Image(ImageRef),
}

impl ContentItem {
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentItem::Paragraph(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ContentItem::Table(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentItem::Image(_))
    }
}

/// An image reference carried through assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Opaque reference supplied by the document reader
    #[serde(rename = "ref", alias = "imageRef")]
    pub image_ref: String,

    /// Image width as a percentage of page width
    pub width_percent: f32,

    /// Image height as a percentage of page height
    pub height_percent: f32,
}

impl ImageRef {
    /// Create an image reference.
    pub fn new(image_ref: impl Into<String>, width_percent: f32, height_percent: f32) -> Self {
        Self {
            image_ref: image_ref.into(),
            width_percent,
            height_percent,
        }
    }
}
