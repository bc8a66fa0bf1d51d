//! Rendering module for converting documents to various output formats.

mod html;
mod json;
mod markdown;
mod options;
mod text;

pub use html::{escape_html, to_html, HtmlRenderer};
pub use json::{to_json, to_sections_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
pub use text::to_text;
