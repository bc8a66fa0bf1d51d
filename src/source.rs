//! Page sources: where the layout engine pulls pages from.
//!
//! The engine never reads files itself. It asks a [`PageSource`] for one page
//! at a time, in ascending page order, until the source is exhausted.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::vec;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Page;

/// A lazily consumed, ordered stream of pages belonging to one document.
pub trait PageSource {
    /// Identifier of the document these pages belong to.
    fn document_id(&self) -> &str;

    /// The next page, or `None` once the document is exhausted.
    fn next_page(&mut self) -> Result<Option<Page>>;
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn document_id(&self) -> &str {
        (**self).document_id()
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        (**self).next_page()
    }
}

/// Pages already in memory.
#[derive(Debug, Clone)]
pub struct VecPageSource {
    document_id: String,
    pages: vec::IntoIter<Page>,
    next_number: u32,
}

impl VecPageSource {
    /// Create a source over `pages`. Unnumbered pages (number 0) are
    /// numbered by position, starting at 1.
    pub fn new(document_id: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            document_id: document_id.into(),
            pages: pages.into_iter(),
            next_number: 1,
        }
    }

    /// Pages not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pages.len()
    }
}

impl PageSource for VecPageSource {
    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        let Some(mut page) = self.pages.next() else {
            return Ok(None);
        };
        if page.number == 0 {
            page.number = self.next_number;
        }
        self.next_number = page.number.saturating_add(1);
        Ok(Some(page))
    }
}

/// Accepted shapes of a JSON page stream.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageStream {
    Document {
        #[serde(default, alias = "id")]
        document: Option<String>,
        pages: Vec<Page>,
    },
    Pages(Vec<Page>),
}

/// Pages decoded from a JSON page stream.
///
/// Two shapes are accepted: an object `{"document": "...", "pages": [...]}`
/// and a bare array of pages. When the document id is missing it falls back
/// to the file stem, or to the id supplied by the caller.
#[derive(Debug, Clone)]
pub struct JsonPageSource {
    inner: VecPageSource,
}

impl JsonPageSource {
    /// Read a page stream from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("Loaded page stream {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data, fallback)
    }

    /// Decode a page stream from bytes.
    pub fn from_bytes(data: &[u8], fallback_id: impl Into<String>) -> Result<Self> {
        let stream: PageStream = serde_json::from_slice(data)?;
        Ok(Self::from_stream(stream, fallback_id.into()))
    }

    /// Decode a page stream from a reader.
    pub fn from_reader<R: Read>(reader: R, fallback_id: impl Into<String>) -> Result<Self> {
        let stream: PageStream = serde_json::from_reader(reader)?;
        Ok(Self::from_stream(stream, fallback_id.into()))
    }

    fn from_stream(stream: PageStream, fallback_id: String) -> Self {
        let (id, pages) = match stream {
            PageStream::Document { document, pages } => {
                (document.filter(|d| !d.trim().is_empty()).unwrap_or(fallback_id), pages)
            }
            PageStream::Pages(pages) => (fallback_id, pages),
        };
        Self {
            inner: VecPageSource::new(id, pages),
        }
    }

    /// Pages not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl PageSource for JsonPageSource {
    fn document_id(&self) -> &str {
        self.inner.document_id()
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        self.inner.next_page()
    }
}

/// Collect every `.json` page stream in `dir`, sorted by file name.
pub fn list_page_streams<P: AsRef<Path>>(dir: P) -> Result<Vec<std::path::PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Other(format!("{} is not a directory", dir.display())));
    }
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_numbers_pages() {
        let mut source = VecPageSource::new("doc", vec![Page::new(0, 10.0, 10.0), Page::new(0, 10.0, 10.0)]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_page().unwrap().unwrap().number, 1);
        assert_eq!(source.next_page().unwrap().unwrap().number, 2);
        assert!(source.next_page().unwrap().is_none());
    }

    #[test]
    fn test_vec_source_keeps_explicit_numbers() {
        let mut source = VecPageSource::new("doc", vec![Page::new(5, 10.0, 10.0), Page::new(0, 10.0, 10.0)]);
        assert_eq!(source.next_page().unwrap().unwrap().number, 5);
        assert_eq!(source.next_page().unwrap().unwrap().number, 6);
    }

    #[test]
    fn test_json_document_shape() {
        let json = br#"{
            "document": "notice-1",
            "pages": [
                {"number": 1, "width": 595, "height": 842,
                 "textBlocks": [{"bbox": [10, 10, 100, 20], "text": "MONTAGE", "maxFontSize": 14}],
                 "imageBlocks": [{"bbox": [10, 30, 100, 130], "imageRef": "img-1.png"}]}
            ]
        }"#;
        let mut source = JsonPageSource::from_bytes(json, "fallback").unwrap();
        assert_eq!(source.document_id(), "notice-1");
        let page = source.next_page().unwrap().unwrap();
        assert_eq!(page.text_blocks.len(), 1);
        assert_eq!(page.image_blocks[0].image_ref, "img-1.png");
        assert!(source.next_page().unwrap().is_none());
    }

    #[test]
    fn test_json_bare_array_uses_fallback_id() {
        let json = br#"[{"width": 595, "height": 842}]"#;
        let mut source = JsonPageSource::from_bytes(json, "stem").unwrap();
        assert_eq!(source.document_id(), "stem");
        assert_eq!(source.next_page().unwrap().unwrap().number, 1);
    }

    #[test]
    fn test_json_malformed() {
        let result = JsonPageSource::from_bytes(b"{not json", "x");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
