//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话状态和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session` - 会话编排器
//! - 独占会话状态（文件选择、处理状态、进度、报告、错误）
//! - 提供迁移操作：add_files / remove_file / start / reset
//! - 每次迁移后发布不可变快照（`tokio::sync::watch`）
//! - 把运行中的任何失败折叠为一条通用提示
//!
//! ### `app` - 交互式终端
//! - 管理应用生命周期（初始化、命令循环）
//! - 订阅快照显示进度
//! - 持有当前标签页，调用展示层渲染和导出
//!
//! ## 层次关系
//!
//! ```text
//! app (命令循环 / 展示)
//!     ↓
//! session::Orchestrator (状态机)
//!     ↓
//! workflow::RunFlow (一次运行：逐篇分析 → 综合)
//!     ↓
//! services (能力层：analysis / synthesis)
//!     ↓
//! infrastructure (基础设施：GeminiClient / 文档编码)
//! ```

pub mod app;
pub mod session;

// 重新导出主要类型
pub use app::{App, Command};
pub use session::{limit_notice, Orchestrator, GENERIC_ERROR_MESSAGE};
