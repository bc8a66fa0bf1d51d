//! Final clean-up pass over the accumulated sections.

use std::collections::HashSet;

use crate::model::{ContentItem, Section};

use super::filters::{alnum_count, normalize_title, TocClassifier};

/// Prune residual TOC sections, duplicate titles and degenerate content.
///
/// In order, for each section:
/// 1. drop it if its title looks like a table of contents;
/// 2. drop it if its normalized title is blank or was already seen (first wins,
///    later duplicates are discarded with their content);
/// 3. strip paragraphs of `min_line_chars` characters or fewer, then drop the
///    section if nothing is left and its title has at most two alphanumerics.
pub fn finalize_sections(
    sections: Vec<Section>,
    toc: &TocClassifier,
    min_line_chars: usize,
) -> Vec<Section> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::with_capacity(sections.len());

    for section in sections {
        let title = section.title.trim();
        if toc.is_toc(title) {
            log::debug!("Finalizer: dropping TOC section {:?}", title);
            continue;
        }

        let key = normalize_title(title);
        if key.is_empty() || seen.contains(&key) {
            log::debug!("Finalizer: dropping duplicate section {:?}", title);
            continue;
        }

        let content: Vec<ContentItem> = section
            .content
            .into_iter()
            .filter_map(|item| match item {
                ContentItem::Paragraph(text) => {
                    let text = text.trim();
                    (text.chars().count() > min_line_chars)
                        .then(|| ContentItem::Paragraph(text.to_string()))
                }
                other => Some(other),
            })
            .collect();

        if content.is_empty() && alnum_count(title) <= 2 {
            continue;
        }

        seen.insert(key);
        cleaned.push(Section {
            title: title.to_string(),
            content,
        });
    }

    cleaned
}
