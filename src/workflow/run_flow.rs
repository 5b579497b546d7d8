//! 运行流程 - 流程层
//!
//! 核心职责：定义"一次运行"的完整处理流程
//!
//! 流程顺序：
//! 1. 按选择顺序逐篇分析（严格串行，任何一篇失败立即中止）
//! 2. 对全部分析结果做一次综合
//! 3. 组装报告

use std::sync::Arc;
use tracing::{error, info};

use crate::error::AppError;
use crate::infrastructure::GenerativeModel;
use crate::models::{ArticleAnalysis, Progress, SynthesisReport, UploadedDocument};
use crate::services::{AnalysisService, SynthesisService};
use crate::utils::logging::truncate_text;
use crate::workflow::article_ctx::ArticleCtx;

/// 运行过程中的阶段事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// 即将分析第 `current` 篇
    Extracting(Progress),
    /// 全部分析完成，开始综合
    Synthesizing,
}

/// 运行流程
///
/// - 编排完整的运行顺序
/// - 通过事件回调报告阶段，不持有状态
/// - 只依赖业务能力（services）
pub struct RunFlow {
    analysis_service: AnalysisService,
    synthesis_service: SynthesisService,
}

impl RunFlow {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            analysis_service: AnalysisService::new(model.clone()),
            synthesis_service: SynthesisService::new(model),
        }
    }

    /// 执行一次完整运行
    ///
    /// # 参数
    /// - `documents`: 按选择顺序排列的文档
    /// - `on_event`: 每个阶段开始前调用
    ///
    /// # 返回
    /// 全部成功时返回报告；第一个失败即返回错误，剩余文档不再处理
    pub async fn run<F>(
        &self,
        documents: &[UploadedDocument],
        mut on_event: F,
    ) -> Result<SynthesisReport, AppError>
    where
        F: FnMut(RunEvent),
    {
        let total = documents.len();
        let mut analyses: Vec<ArticleAnalysis> = Vec::with_capacity(total);

        for (i, document) in documents.iter().enumerate() {
            let ctx = ArticleCtx::new(i + 1, total, &document.name);
            on_event(RunEvent::Extracting(Progress {
                current: ctx.index,
                total,
            }));

            info!("{} 📄 正在分析...", ctx);
            let analysis = self.analysis_service.analyze(document).await.map_err(|e| {
                error!("{} ❌ 分析失败: {}", ctx, e);
                e
            })?;
            info!(
                "{} ✓ 分析完成: {}",
                ctx,
                truncate_text(&analysis.title, 60)
            );

            analyses.push(analysis);
        }

        on_event(RunEvent::Synthesizing);
        info!("🤖 正在综合 {} 篇文章...", analyses.len());

        let fields = self
            .synthesis_service
            .synthesize(&analyses)
            .await
            .map_err(|e| {
                error!("❌ 综合失败: {}", e);
                e
            })?;

        info!("✓ 综合完成");

        Ok(SynthesisReport::new(analyses, fields))
    }
}
