//! 会话状态快照
//!
//! 编排层每次状态迁移后发布一个新的不可变快照，展示层只读取快照

use super::SynthesisReport;
use std::fmt;
use std::sync::Arc;

/// 处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessStatus {
    #[default]
    Idle,
    Extracting,
    Synthesizing,
    Completed,
    Error,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Idle => "idle",
            ProcessStatus::Extracting => "extracting",
            ProcessStatus::Synthesizing => "synthesizing",
            ProcessStatus::Completed => "completed",
            ProcessStatus::Error => "error",
        }
    }

    /// 是否允许修改文件选择或开始新的运行
    pub fn accepts_selection(&self) -> bool {
        matches!(self, ProcessStatus::Idle | ProcessStatus::Error)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 提取进度（只在 extracting 状态有意义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// 当前正在处理的文件（从1开始）
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// 进度百分比，total 为 0 时返回 0
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.current.min(self.total) * 100) / self.total) as u8
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// 会话快照
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub status: ProcessStatus,
    pub progress: Progress,
    /// 已选文件的显示名称（按选择顺序）
    pub files: Vec<String>,
    pub report: Option<Arc<SynthesisReport>>,
    /// 面向用户的错误信息
    pub error: Option<String>,
}
