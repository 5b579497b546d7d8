//! Markdown 表格 → HTML 表格
//!
//! 规则：
//! - 含 `|` 的行才是表格行
//! - 每个单元格都形如 `---`、`:--`、`--:`、`:-:` 的行是表头分隔行，丢弃
//! - 第一行有效行是表头，其余是数据行；数据行单元格数按表头补齐或截断
//! - 有效行少于两行时输出占位文本

use super::escape_html;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 表格不可用时的占位 HTML
pub const MATRIX_UNAVAILABLE: &str = r#"<p class="placeholder">Tabela não disponível.</p>"#;

/// 解析后的表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    /// 解析 Markdown 表格，有效行少于两行时返回 `None`
    pub fn parse(markdown: &str) -> Option<Self> {
        let mut content_rows = markdown
            .trim()
            .lines()
            .filter(|line| line.contains('|'))
            .map(split_cells)
            .filter(|cells| !is_divider(cells));

        let header = content_rows.next()?;
        let width = header.len();

        let rows: Vec<Vec<String>> = content_rows
            .map(|mut cells| {
                if cells.len() != width {
                    debug!("矩阵行单元格数 {} 与表头 {} 不一致", cells.len(), width);
                    cells.resize(width, String::new());
                }
                cells
            })
            .collect();

        if rows.is_empty() {
            return None;
        }

        Some(Self { header, rows })
    }

    pub fn to_html(&self) -> String {
        let header: String = self
            .header
            .iter()
            .map(|c| format!("<th>{}</th>", escape_html(c)))
            .collect();

        let body: String = self
            .rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|c| format!("<td>{}</td>", escape_html(c)))
                    .collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect();

        format!(
            "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
            header, body
        )
    }
}

/// 把矩阵渲染为 HTML 表格，无法解析时返回占位文本
pub fn render_matrix(markdown: &str) -> String {
    match MarkdownTable::parse(markdown) {
        Some(table) => table.to_html(),
        None => MATRIX_UNAVAILABLE.to_string(),
    }
}

fn divider_cell() -> &'static Regex {
    static DIVIDER: OnceLock<Regex> = OnceLock::new();
    DIVIDER.get_or_init(|| Regex::new(r"^:?-+:?$").expect("divider pattern is valid"))
}

fn is_divider(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| divider_cell().is_match(c))
}

/// 按未转义的 `|` 切分单元格，去掉首尾的外侧竖线
fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());

    cells
}
