//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块独占会话状态（已选文件、处理状态、进度、报告、错误信息），
//! 只通过明确的迁移操作修改它：
//!
//! - `add_files` / `remove_file`：idle 或 error 状态下修改选择
//! - `start`：idle / error → extracting → synthesizing → completed（失败则 error）
//! - `reset`：任意状态回到 idle，丢弃所有累积状态
//!
//! 每次迁移后发布一个新的 `SessionSnapshot`，展示层通过 `subscribe()` 订阅，
//! 自身不持有任何状态。
//!
//! ## 状态机
//!
//! ```text
//! idle ──start──▶ extracting ──▶ synthesizing ──▶ completed
//!  ▲                  │                │              │
//!  │                  └──────▶ error ◀─┘              │
//!  └───────────────────── reset ◀─────────────────────┘
//! ```

use crate::error::{AppError, AppResult, SelectionError, StateError};
use crate::infrastructure::GenerativeModel;
use crate::models::{
    ProcessStatus, Progress, SessionSnapshot, SynthesisReport, UploadedDocument,
};
use crate::utils::logging::{log_run_failed, log_run_finished, log_run_start};
use crate::workflow::{RunEvent, RunFlow};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 面向用户的通用失败信息（具体原因只写入日志）
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro durante o processamento. Verifique sua chave de API ou a integridade dos arquivos.";

/// 超过文件上限时的提示
pub fn limit_notice(max_files: usize) -> String {
    format!("Limite máximo de {} arquivos permitido.", max_files)
}

/// 编排器内部状态
#[derive(Debug, Default)]
struct SessionState {
    status: ProcessStatus,
    progress: Progress,
    report: Option<Arc<SynthesisReport>>,
    error: Option<String>,
}

impl SessionState {
    /// 进入 extracting：清空上次的报告和错误，进度归零
    fn begin(&mut self, total: usize) {
        self.report = None;
        self.error = None;
        self.status = ProcessStatus::Extracting;
        self.progress = Progress { current: 0, total };
    }

    fn apply(&mut self, event: RunEvent) {
        match event {
            RunEvent::Extracting(progress) => {
                self.status = ProcessStatus::Extracting;
                self.progress = progress;
            }
            RunEvent::Synthesizing => self.status = ProcessStatus::Synthesizing,
        }
    }
}

/// 会话编排器
pub struct Orchestrator {
    flow: RunFlow,
    max_files: usize,
    files: Vec<UploadedDocument>,
    state: SessionState,
    tx: watch::Sender<SessionSnapshot>,
}

impl Orchestrator {
    /// 创建新的编排器，初始状态为 idle
    pub fn new(model: Arc<dyn GenerativeModel>, max_files: usize) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            flow: RunFlow::new(model),
            max_files,
            files: Vec::new(),
            state: SessionState::default(),
            tx,
        }
    }

    /// 订阅状态快照
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// 当前快照
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// 已选文件（按选择顺序）
    pub fn files(&self) -> &[UploadedDocument] {
        &self.files
    }

    /// 批量添加文件
    ///
    /// 非 PDF 文件、不存在的路径和目录都被跳过；若添加后超过上限，整批拒绝且选择不变
    ///
    /// # 返回
    /// 返回实际添加的数量
    pub fn add_files<I, P>(&mut self, paths: I) -> AppResult<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.ensure_selection_allowed("add_files")?;

        let batch: Vec<UploadedDocument> = paths
            .into_iter()
            .filter_map(|p| {
                let doc = UploadedDocument::from_path(&p);
                if doc.is_none() {
                    debug!("跳过不可用的文件: {}", p.as_ref().display());
                }
                doc
            })
            .collect();

        if self.files.len() + batch.len() > self.max_files {
            warn!(
                "⚠️ 拒绝添加 {} 个文件: 已选 {}, 上限 {}",
                batch.len(),
                self.files.len(),
                self.max_files
            );
            return Err(SelectionError::LimitExceeded {
                selected: self.files.len(),
                adding: batch.len(),
                max: self.max_files,
            }
            .into());
        }

        let added = batch.len();
        self.files.extend(batch);
        debug!("已添加 {} 个文件，共 {} 个", added, self.files.len());

        self.publish();
        Ok(added)
    }

    /// 移除已选文件（序号从0开始）
    pub fn remove_file(&mut self, index: usize) -> AppResult<UploadedDocument> {
        self.ensure_selection_allowed("remove_file")?;

        if index >= self.files.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                len: self.files.len(),
            }
            .into());
        }

        let removed = self.files.remove(index);
        debug!("已移除文件: {}", removed.name);

        self.publish();
        Ok(removed)
    }

    /// 开始一次运行
    ///
    /// 文件严格按选择顺序逐个处理。运行本身失败不会返回 `Err`，
    /// 而是进入 error 状态并在快照中给出通用错误信息。
    ///
    /// # 返回
    /// 返回运行结束时的状态（completed 或 error）
    pub async fn start(&mut self) -> AppResult<ProcessStatus> {
        self.ensure_selection_allowed("start")?;

        if self.files.is_empty() {
            return Err(SelectionError::NoFiles.into());
        }

        let total = self.files.len();
        self.state.begin(total);
        self.publish();

        log_run_start(total);

        let Self {
            flow,
            files,
            state,
            tx,
            ..
        } = &mut *self;
        let files: &[UploadedDocument] = files;

        let result = flow
            .run(files, |event| {
                state.apply(event);
                tx.send_replace(build_snapshot(files, state));
            })
            .await;

        match result {
            Ok(report) => {
                log_run_finished(report.analyses.len());
                self.state.report = Some(Arc::new(report));
                self.state.status = ProcessStatus::Completed;
            }
            Err(e) => {
                log_run_failed(&e);
                self.state.error = Some(GENERIC_ERROR_MESSAGE.to_string());
                self.state.status = ProcessStatus::Error;
            }
        }

        self.publish();
        Ok(self.state.status)
    }

    /// 重置会话：清空文件选择、报告和错误信息，回到 idle
    pub fn reset(&mut self) {
        info!("🧹 重置会话");
        self.files.clear();
        self.state = SessionState::default();
        self.publish();
    }

    fn ensure_selection_allowed(&self, operation: &'static str) -> Result<(), AppError> {
        if self.state.status.accepts_selection() {
            Ok(())
        } else {
            Err(StateError::NotAllowed {
                status: self.state.status.as_str(),
                operation,
            }
            .into())
        }
    }

    fn publish(&self) {
        self.tx.send_replace(build_snapshot(&self.files, &self.state));
    }
}

fn build_snapshot(files: &[UploadedDocument], state: &SessionState) -> SessionSnapshot {
    SessionSnapshot {
        status: state.status,
        progress: state.progress,
        files: files.iter().map(|f| f.name.clone()).collect(),
        report: state.report.clone(),
        error: state.error.clone(),
    }
}
