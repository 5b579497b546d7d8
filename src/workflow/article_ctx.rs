//! 文章处理上下文
//!
//! 封装"我正在处理本次运行的第几篇文章"这一信息

use std::fmt::Display;

/// 文章处理上下文
#[derive(Debug, Clone)]
pub struct ArticleCtx {
    /// 文章在本次运行中的序号（从1开始）
    pub index: usize,

    /// 本次运行的文章总数
    pub total: usize,

    /// 文件名（仅用于日志显示）
    pub filename: String,
}

impl ArticleCtx {
    pub fn new(index: usize, total: usize, filename: impl Into<String>) -> Self {
        Self {
            index,
            total,
            filename: filename.into(),
        }
    }
}

impl Display for ArticleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文章 {}/{} {}]", self.index, self.total, self.filename)
    }
}
