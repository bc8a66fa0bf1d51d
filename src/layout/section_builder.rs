//! Section assembly across page boundaries.
//!
//! The builder keeps an explicit index of the section currently being written.
//! Only a recognized title closes it and opens the next one, so a section begun
//! at the bottom of one page keeps receiving content from the next page.

use crate::model::{ContentItem, ImageRef, Section, Table};

use super::filters::{alnum_count, is_all_uppercase, TocClassifier};
use super::options::LayoutOptions;
use super::reading_order::{PageItem, TextLine};

/// Accumulates sections from page items in reading order.
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    sections: Vec<Section>,
    open: Option<usize>,
    toc: TocClassifier,
    title_font_size: f32,
    min_row_chars: usize,
    intro_title: String,
    table_title: String,
}

impl SectionBuilder {
    /// Create an empty builder.
    pub fn new(options: &LayoutOptions, toc: TocClassifier) -> Self {
        Self {
            sections: Vec::new(),
            open: None,
            toc,
            title_font_size: options.title_font_size,
            min_row_chars: options.min_row_chars,
            intro_title: options.intro_title.clone(),
            table_title: options.table_title.clone(),
        }
    }

    /// Whether a text row qualifies as a section title.
    ///
    /// It must be all uppercase or set at or above the title font size, must
    /// not look like a table of contents, and must carry more than two
    /// alphanumeric characters.
    pub fn is_title(&self, line: &TextLine) -> bool {
        let styled = is_all_uppercase(&line.text) || line.max_font_size >= self.title_font_size;
        styled && !self.toc.is_toc(&line.text) && alnum_count(&line.text) > 2
    }

    /// Feed one page item.
    pub fn push(&mut self, item: PageItem) {
        match item {
            PageItem::Text(line) => self.push_text(line),
            PageItem::Table(table) => self.push_table(table),
            PageItem::Image(image) => self.push_image(image),
        }
    }

    /// Feed a text row: open a section on a title, otherwise append a paragraph.
    pub fn push_text(&mut self, line: TextLine) {
        let text = line.text.trim();
        if text.chars().count() <= self.min_row_chars {
            return;
        }

        if self.is_title(&line) {
            self.open_section(Section::new(text));
        } else {
            let title = self.intro_title.clone();
            self.current_or_open(title)
                .push(ContentItem::Paragraph(text.to_string()));
        }
    }

    /// Append a table to the open section.
    pub fn push_table(&mut self, table: Table) {
        let title = self.table_title.clone();
        self.current_or_open(title).push(ContentItem::Table(table));
    }

    /// Append an image to the open section.
    pub fn push_image(&mut self, image: ImageRef) {
        let title = self.intro_title.clone();
        self.current_or_open(title).push(ContentItem::Image(image));
    }

    /// The section currently receiving content.
    pub fn current(&self) -> Option<&Section> {
        self.open.and_then(|i| self.sections.get(i))
    }

    /// Sections built so far.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Close the open section and return everything built.
    pub fn finish(self) -> Vec<Section> {
        self.sections
    }

    fn open_section(&mut self, section: Section) {
        self.sections.push(section);
        self.open = Some(self.sections.len() - 1);
    }

    fn current_or_open(&mut self, implicit_title: String) -> &mut Section {
        let idx = match self.open {
            Some(idx) => idx,
            None => {
                self.open_section(Section::new(implicit_title));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }
}
