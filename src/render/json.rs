//! JSON rendering for reconstructed documents.
//!
//! Two shapes are produced: the full document (`metadata` plus `sections`)
//! and the bare section list handed to the publishing layer.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

impl JsonFormat {
    fn write<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        let result = match self {
            JsonFormat::Pretty => serde_json::to_string_pretty(value),
            JsonFormat::Compact => serde_json::to_string(value),
        };
        result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}

/// Convert a document to JSON, metadata included.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    format.write(doc)
}

/// Convert a document to the bare ordered list of sections.
pub fn to_sections_json(doc: &Document, format: JsonFormat) -> Result<String> {
    format.write(&doc.sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentItem, ImageRef, Section, Table};

    fn sample() -> Document {
        let mut section = Section::new("MONTAGE");
        section.push(ContentItem::Paragraph("Fixer le support.".to_string()));
        section.push(ContentItem::Table(Table::from_rows(vec![
            vec!["Réf", "Qté"],
            vec!["Vis", "4"],
        ])));
        section.push(ContentItem::Image(ImageRef::new("img_p1_0", 40.0, 10.0)));
        Document::from_sections(vec![section])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("MONTAGE"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_sections_json_is_bare_list() {
        let json = to_sections_json(&sample(), JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let sections = value.as_array().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0]["title"], "MONTAGE");

        let content = &sections[0]["content"];
        assert_eq!(content[0]["data"], "Fixer le support.");
        assert_eq!(content[1]["data"]["rows"], serde_json::json!([["Réf", "Qté"], ["Vis", "4"]]));
        assert_eq!(content[1]["data"]["headerRowIndex"], 0);
        assert_eq!(content[2]["data"]["ref"], "img_p1_0");
        assert_eq!(content[2]["data"]["widthPercent"], 40.0);
    }
}
