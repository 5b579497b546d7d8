//! # Acadêmico IA
//!
//! 学术文献综合工具：上传至多 20 篇 PDF 论文，逐篇交给生成式模型做结构化提取，
//! 再让模型生成比较矩阵、叙述综合和冲突分析，最后以标签页视图展示或导出 Markdown。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端、凭证），只暴露能力
//! - `GeminiClient` - `GenerativeModel` 的实现，提交文档与指令，返回 JSON 文本
//! - `document_encoder` - 读取 PDF 并编码为 base64 载荷
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `AnalysisService` - 单篇文章的七字段结构化分析
//! - `SynthesisService` - 跨文章的矩阵、叙述综合与冲突
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次运行"的完整流程
//! - `ArticleCtx` - 上下文封装（序号 + 文件名）
//! - `RunFlow` - 流程编排（逐篇分析 → 综合 → 报告）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 会话状态机，发布不可变快照
//! - `orchestrator/app` - 交互式终端
//!
//! 展示层 `presentation/` 只读取报告：标签页 HTML 渲染与 Markdown 导出。

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{GeminiClient, GenerativeModel};
pub use models::{ArticleAnalysis, ProcessStatus, SessionSnapshot, SynthesisReport, UploadedDocument};
pub use orchestrator::{App, Orchestrator};
pub use workflow::{RunEvent, RunFlow};
