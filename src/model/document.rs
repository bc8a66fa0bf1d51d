//! Document-level types.

use super::{ContentItem, Section};
use serde::{Deserialize, Serialize};

/// A reconstructed document: an ordered sequence of sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Where the document came from and how much of it was usable
    pub metadata: Metadata,

    /// Sections in reading order
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from sections.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self {
            metadata: Metadata::default(),
            sections,
        }
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    ///
    /// An empty document is a normal outcome; callers decide whether to publish it.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Find a section by exact title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Count tables across all sections.
    pub fn table_count(&self) -> usize {
        self.items().filter(|i| i.is_table()).count()
    }

    /// Count images across all sections.
    pub fn image_count(&self) -> usize {
        self.items().filter(|i| i.is_image()).count()
    }

    fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.sections.iter().flat_map(|s| s.content.iter())
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Source document identifier
    pub source: Option<String>,

    /// Number of pages read from the source
    pub page_count: u32,

    /// Pages that yielded no usable blocks
    pub pages_skipped: u32,
}
