use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::error::AppError;

/// 初始化会话日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n学术综合会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `model`: 模型名称
/// - `max_files`: 文件数量上限
pub fn log_startup(model: &str, max_files: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 学术文献综合模式");
    info!("🤖 模型: {}", model);
    info!("📊 文件上限: {}", max_files);
    info!("{}", "=".repeat(60));
}

/// 记录运行开始信息
pub fn log_run_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始新的运行: 共 {} 篇文章", total);
    info!("💡 逐篇串行分析，全部完成后再综合");
    info!("{}", "=".repeat(60));
}

/// 记录运行完成信息
pub fn log_run_finished(analyses: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✅ 运行完成: {} 篇文章已综合", analyses);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

/// 记录运行失败的具体原因（不展示给用户）
pub fn log_run_failed(err: &AppError) {
    error!("\n{}", "─".repeat(60));
    error!("❌ 运行失败: {}", err);
    error!("{}", "─".repeat(60));
}

/// 记录报告导出
pub fn log_export(path: &Path) {
    info!("💾 报告已导出至: {}", path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
