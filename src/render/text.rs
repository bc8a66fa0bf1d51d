//! Plain text rendering for reconstructed documents.

use crate::error::Result;
use crate::model::Document;

use super::RenderOptions;

/// Convert a document to plain text.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();
    if options.include_document_title {
        if let Some(ref source) = doc.metadata.source {
            output.push_str(source);
            output.push_str("\n\n");
        }
    }
    output.push_str(&doc.plain_text());
    Ok(output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentItem, Section};

    #[test]
    fn test_to_text() {
        let mut section = Section::new("MONTAGE");
        section.push(ContentItem::Paragraph("Fixer le support.".to_string()));
        section.push(ContentItem::Paragraph("Serrer les vis.".to_string()));
        let doc = Document::from_sections(vec![section]);

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result, "MONTAGE\nFixer le support.\nSerrer les vis.");
    }
}
