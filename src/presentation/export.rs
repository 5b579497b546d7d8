//! Markdown 报告导出
//!
//! 固定四个章节：矩阵、叙述综合、冲突与分歧、单篇分析

use crate::error::FileError;
use crate::models::SynthesisReport;
use crate::utils::logging::log_export;
use chrono::{NaiveDate, Utc};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// 报告标题
pub const REPORT_TITLE: &str = "Relatório de Síntese de Evidências Acadêmicas";

/// 渲染 Markdown 报告（同一报告多次渲染结果完全相同）
pub fn render_markdown(report: &SynthesisReport) -> String {
    let mut content = format!("# {}\n\n", REPORT_TITLE);
    content.push_str(&format!(
        "## 1. Matriz de Síntese\n\n{}\n\n",
        report.matrix_markdown
    ));
    content.push_str(&format!(
        "## 2. Síntese Narrativa\n\n{}\n\n",
        report.narrative_synthesis
    ));
    content.push_str(&format!(
        "## 3. Conflitos e Divergências\n\n{}\n\n",
        report.conflicts
    ));
    content.push_str("## 4. Análises Individuais\n\n");

    for (i, a) in report.analyses.iter().enumerate() {
        // 写入 String 不会失败
        let _ = write!(
            content,
            "### Artigo {}: {}\n**Autores:** {} ({})\n**Problema:** {}\n**Metodologia:** {}\n**Achados:** {}\n**Crítica:** {}\n\n",
            i + 1,
            a.title,
            a.authors,
            a.year,
            a.problem,
            a.methodology,
            a.findings,
            a.critique
        );
    }

    content
}

/// 导出文件名：`sintese_academica_<YYYY-MM-DD>.md`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sintese_academica_{}.md", date.format("%Y-%m-%d"))
}

/// 把报告写入 `output_dir`，返回文件路径
///
/// # 参数
/// - `report`: 已完成的报告
/// - `output_dir`: 输出目录（必须已存在）
/// - `date`: 用于文件名的日期
pub async fn write_report(
    report: &SynthesisReport,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, FileError> {
    if !output_dir.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: output_dir.display().to_string(),
        });
    }

    let path = output_dir.join(export_file_name(date));
    tokio::fs::write(&path, render_markdown(report).as_bytes())
        .await
        .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

    log_export(&path);
    Ok(path)
}

/// 以当前 UTC 日期写入报告
pub async fn write_report_today(
    report: &SynthesisReport,
    output_dir: &Path,
) -> Result<PathBuf, FileError> {
    write_report(report, output_dir, today_utc()).await
}

/// 文件名使用的日期（UTC）
fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
