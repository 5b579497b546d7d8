//! 展示层
//!
//! 只读取 `SynthesisReport`，渲染标签页视图或导出 Markdown

pub mod export;
pub mod matrix;
pub mod render;

pub use export::{export_file_name, render_markdown, write_report, write_report_today};
pub use matrix::{render_matrix, MarkdownTable, MATRIX_UNAVAILABLE};
pub use render::{render_paragraphs, render_tab, Tab};

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
