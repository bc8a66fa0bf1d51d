//! Block filters applied before row clustering: footer band, table-of-contents
//! detection and running-header deduplication.

use std::collections::HashMap;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::BBox;

use super::options::LayoutOptions;

/// Whether a block starts inside the footer band of the page.
pub fn is_footer(bbox: &BBox, page_height: f32, footer_fraction: f32) -> bool {
    bbox.y0 > page_height * (1.0 - footer_fraction)
}

/// Whether a block ends inside the header band of the page.
pub fn in_header_band(bbox: &BBox, page_height: f32, header_band_fraction: f32) -> bool {
    bbox.y1 < page_height * header_band_fraction
}

/// Strip accents: NFKD decomposition with combining marks removed.
pub fn fold_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Key under which a running header is counted.
///
/// Letters and digits only, accent-folded, lowercased, truncated to `max_len`.
pub fn normalize_header_key(text: &str, max_len: usize) -> String {
    fold_accents(text)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .take(max_len)
        .collect()
}

/// Key under which section titles are compared for duplicates.
///
/// Accent-folded and lowercased; every run of non-alphanumeric characters
/// becomes a single space and the result is trimmed.
pub fn normalize_title(text: &str) -> String {
    let folded = fold_accents(text).to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Number of alphanumeric characters in `text`.
pub fn alnum_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Whether `text` has at least one cased letter and no lowercase letters.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Heuristic table-of-contents classifier.
///
/// A text is TOC-like when it contains one of the configured keywords, or when
/// it is short and dense in section-number tokens such as `1`, `2.3` or `...`.
/// Numbered clauses like `1. INSTALLATION` are accepted false positives.
#[derive(Debug, Clone)]
pub struct TocClassifier {
    keywords: Vec<String>,
    max_chars: usize,
    section_number: Regex,
}

impl TocClassifier {
    /// Build a classifier from layout options.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            keywords: options.toc_keywords.iter().map(|k| k.to_lowercase()).collect(),
            max_chars: options.toc_max_chars,
            section_number: Regex::new(r"^[\d.]+$").expect("section-number pattern is valid"),
        }
    }

    /// Check whether `text` looks like a table of contents.
    pub fn is_toc(&self, text: &str) -> bool {
        let txt = text.trim().to_lowercase();
        if txt.is_empty() {
            return false;
        }

        if self.keywords.iter().any(|k| !k.is_empty() && txt.contains(k.as_str())) {
            return true;
        }

        if txt.chars().count() >= self.max_chars {
            return false;
        }

        let tokens: Vec<&str> = txt.split_whitespace().collect();
        let numeric = tokens
            .iter()
            .filter(|t| self.section_number.is_match(t))
            .count();
        numeric >= (tokens.len() / 2).max(1)
    }
}

impl Default for TocClassifier {
    fn default() -> Self {
        Self::new(&LayoutOptions::default())
    }
}

/// Tracks running headers across the pages of one document.
///
/// The first occurrence of a normalized header is kept; every later one is
/// dropped. Near-duplicates (e.g. headers embedding a page number) are
/// distinct keys and are not merged.
#[derive(Debug, Clone)]
pub struct HeaderDeduplicator {
    counts: HashMap<String, usize>,
    max_len: usize,
}

impl HeaderDeduplicator {
    /// Create an empty deduplicator truncating keys to `max_len`.
    pub fn new(max_len: usize) -> Self {
        Self {
            counts: HashMap::new(),
            max_len,
        }
    }

    /// Record an occurrence of header `text`; returns `true` if it should be kept.
    pub fn observe(&mut self, text: &str) -> bool {
        let key = normalize_header_key(text, self.max_len);
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// How many times header `text` has been seen so far.
    pub fn occurrences(&self, text: &str) -> usize {
        let key = normalize_header_key(text, self.max_len);
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct headers seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_band() {
        let height = 842.0;
        // threshold = 842 * 0.85 = 715.7
        assert!(is_footer(&BBox::new(0.0, 720.0, 100.0, 730.0), height, 0.15));
        assert!(!is_footer(&BBox::new(0.0, 700.0, 100.0, 730.0), height, 0.15));
    }

    #[test]
    fn test_header_band() {
        let height = 842.0;
        // threshold = 842 * 0.18 = 151.56
        assert!(in_header_band(&BBox::new(0.0, 10.0, 100.0, 40.0), height, 0.18));
        assert!(!in_header_band(&BBox::new(0.0, 140.0, 100.0, 160.0), height, 0.18));
    }

    #[test]
    fn test_normalize_header_key() {
        assert_eq!(
            normalize_header_key("  Notice  d'utilisation – Réf. 107253 ", 120),
            "noticedutilisationref107253"
        );
        assert_eq!(normalize_header_key("ABCDEF", 3), "abc");
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Installation"), "installation");
        assert_eq!(normalize_title("INSTALLATION "), "installation");
        assert_eq!(normalize_title("  Mise en  service :"), "mise en service");
        assert_eq!(normalize_title("Caractéristiques"), "caracteristiques");
        assert_eq!(normalize_title("--"), "");
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("MONTAGE"));
        assert!(is_all_uppercase("MISE EN SERVICE 2"));
        assert!(is_all_uppercase("ÉTAPE"));
        assert!(!is_all_uppercase("Montage"));
        assert!(!is_all_uppercase("1234"));
    }

    #[test]
    fn test_toc_keywords() {
        let toc = TocClassifier::default();
        assert!(toc.is_toc("Sommaire"));
        assert!(toc.is_toc("TABLE DES MATIÈRES"));
        assert!(toc.is_toc("Table of Contents"));
        assert!(!toc.is_toc("Montage"));
        assert!(!toc.is_toc("   "));
    }

    #[test]
    fn test_toc_token_density() {
        let toc = TocClassifier::default();
        assert!(toc.is_toc("1 2.1 3"));
        assert!(toc.is_toc("Installation 1.2"));
        assert!(toc.is_toc("Montage ....... 4"));
        assert!(!toc.is_toc("Fixez le support au mur."));
        assert!(!toc.is_toc("MONTAGE"));
    }

    #[test]
    fn test_toc_long_text_not_dense() {
        let toc = TocClassifier::default();
        let long = "1 2 3 ".repeat(40);
        assert!(long.len() >= 200);
        assert!(!toc.is_toc(&long));
    }

    #[test]
    fn test_header_dedup() {
        let mut headers = HeaderDeduplicator::new(120);
        assert!(headers.observe("AVIDSEN - Notice"));
        assert!(!headers.observe("avidsen notice"));
        assert!(!headers.observe("AVIDSEN – NOTICE"));
        assert_eq!(headers.occurrences("Avidsen Notice"), 3);
        // a different page number is a different header
        assert!(headers.observe("Notice page 2"));
        assert_eq!(headers.len(), 2);
    }
}
