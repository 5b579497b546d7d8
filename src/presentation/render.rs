//! 报告视图渲染
//!
//! 三个标签页都是对 `SynthesisReport` 的纯函数渲染，不持有状态

use super::escape_html;
use super::matrix::render_matrix;
use crate::models::{ArticleAnalysis, SynthesisReport};
use std::fmt;
use std::str::FromStr;

/// 报告标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// 单篇分析
    #[default]
    Individual,
    /// 综合矩阵
    Matrix,
    /// 叙述综合与冲突
    Synthesis,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Individual, Tab::Matrix, Tab::Synthesis];

    /// 标签页标题
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Individual => "Análises Individuais",
            Tab::Matrix => "Matriz de Síntese",
            Tab::Synthesis => "Síntese Narrativa & Conflitos",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Individual => "individual",
            Tab::Matrix => "matrix",
            Tab::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("aba desconhecida: {}", s))
    }
}

/// 渲染指定标签页
pub fn render_tab(report: &SynthesisReport, tab: Tab) -> String {
    match tab {
        Tab::Individual => render_analyses(&report.analyses),
        Tab::Matrix => render_matrix(&report.matrix_markdown),
        Tab::Synthesis => render_synthesis(report),
    }
}

/// 每篇分析一个 `<article>` 块
pub fn render_analyses(analyses: &[ArticleAnalysis]) -> String {
    analyses
        .iter()
        .enumerate()
        .map(|(i, a)| render_analysis(i + 1, a))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_analysis(number: usize, a: &ArticleAnalysis) -> String {
    let mut html = format!(
        "<article id=\"{}\">\n<span class=\"badge\">Artigo {}</span>\n<h3>{}</h3>\n",
        escape_html(&a.id),
        number,
        escape_html(&a.title)
    );
    html.push_str(&format!(
        "<p class=\"meta\"><span>👤 {}</span> <span>📅 {}</span> <span>📄 {}</span></p>\n",
        escape_html(&a.authors),
        escape_html(&a.year),
        escape_html(&a.filename)
    ));

    let sections = [
        ("Problema / Lacuna", &a.problem),
        ("Metodologia", &a.methodology),
        ("Achados Principais", &a.findings),
        ("Crítica Técnica", &a.critique),
    ];
    for (heading, text) in sections {
        html.push_str(&format!(
            "<section><h4>{}</h4><p>{}</p></section>\n",
            heading,
            escape_html(text)
        ));
    }

    html.push_str("</article>");
    html
}

fn render_synthesis(report: &SynthesisReport) -> String {
    format!(
        "<section><h3>Síntese Narrativa</h3>\n{}\n</section>\n<section><h3>Conflitos e Divergências</h3>\n{}\n</section>",
        render_paragraphs(&report.narrative_synthesis),
        render_paragraphs(&report.conflicts)
    )
}

/// 每一行文本渲染为一个段落
pub fn render_paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SynthesisReport {
        let analysis = |title: &str| ArticleAnalysis {
            id: format!("id-{}", title),
            filename: format!("{}.pdf", title),
            title: title.to_string(),
            authors: "X & Y".to_string(),
            year: "2020".to_string(),
            problem: "p".to_string(),
            methodology: "m".to_string(),
            findings: "f".to_string(),
            critique: "c".to_string(),
        };

        SynthesisReport {
            analyses: vec![analysis("A"), analysis("B")],
            matrix_markdown: "| A | B |\n|---|---|\n| x | y |".to_string(),
            narrative_synthesis: "n1\nn2".to_string(),
            conflicts: "c1".to_string(),
        }
    }

    #[test]
    fn test_individual_tab_has_one_block_per_analysis() {
        let html = render_tab(&report(), Tab::Individual);
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains("Artigo 1</span>\n<h3>A</h3>"));
        assert!(html.contains("Artigo 2</span>\n<h3>B</h3>"));
        assert!(html.contains("X &amp; Y"));
        assert!(html.contains("📄 B.pdf"));
        assert_eq!(html.matches("<section>").count(), 8);
    }

    #[test]
    fn test_synthesis_tab_splits_lines_into_paragraphs() {
        let html = render_tab(&report(), Tab::Synthesis);
        assert!(html.contains("<p>n1</p>\n<p>n2</p>"));
        assert!(html.contains("<p>c1</p>"));
    }

    #[test]
    fn test_matrix_tab() {
        let html = render_tab(&report(), Tab::Matrix);
        assert!(html.contains("<td>x</td><td>y</td>"));
    }

    #[test]
    fn test_tab_from_str() {
        assert_eq!("Matrix".parse::<Tab>().unwrap(), Tab::Matrix);
        assert!("outra".parse::<Tab>().is_err());
        assert_eq!(Tab::default(), Tab::Individual);
    }
}
