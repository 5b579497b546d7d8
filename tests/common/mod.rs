//! 集成测试共用的脚本化模型
#![allow(dead_code)]

use academico_ia::error::LlmError;
use academico_ia::infrastructure::{GenerationRequest, GenerativeModel, Part};
use academico_ia::models::ProcessStatus;
use academico_ia::SessionSnapshot;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;

pub const SYNTHESIS_RESPONSE: &str =
    r#"{"matrix":"| A | B |\n|---|---|\n| x | y |","narrative":"n1","conflicts":"c1"}"#;

/// 调用时观察到的状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Analysis {
        title: String,
        status: ProcessStatus,
        current: usize,
        total: usize,
    },
    Synthesis {
        status: ProcessStatus,
    },
}

/// 脚本化模型
///
/// 分析请求：把 PDF 内容（测试中即文章标题）解码后作为 `title` 返回；
/// 综合请求：返回固定的三段文本
#[derive(Default)]
pub struct ScriptedModel {
    /// 内容等于该标题的文档分析失败
    pub fail_on: Option<String>,
    pub fail_synthesis: bool,
    pub observer: Mutex<Option<watch::Receiver<SessionSnapshot>>>,
    pub calls: Mutex<Vec<Observed>>,
}

impl ScriptedModel {
    pub fn failing_on(title: &str) -> Self {
        Self {
            fail_on: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_synthesis() -> Self {
        Self {
            fail_synthesis: true,
            ..Self::default()
        }
    }

    pub fn observe(&self, rx: watch::Receiver<SessionSnapshot>) {
        *self.observer.lock().unwrap() = Some(rx);
    }

    pub fn calls(&self) -> Vec<Observed> {
        self.calls.lock().unwrap().clone()
    }

    fn current_snapshot(&self) -> SessionSnapshot {
        self.observer
            .lock()
            .unwrap()
            .as_ref()
            .map(|rx| rx.borrow().clone())
            .unwrap_or_default()
    }

    fn failure() -> LlmError {
        LlmError::BadStatus {
            model: "scripted".to_string(),
            status: 500,
            body: "falha simulada".to_string(),
        }
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_json(&self, request: GenerationRequest) -> Result<String, LlmError> {
        let snapshot = self.current_snapshot();
        let document = request.parts.iter().find_map(|part| match part {
            Part::Document(payload) => Some(payload.clone()),
            Part::Text(_) => None,
        });

        match document {
            Some(payload) => {
                let bytes = STANDARD.decode(&payload.data).unwrap();
                let title = String::from_utf8(bytes).unwrap();
                self.calls.lock().unwrap().push(Observed::Analysis {
                    title: title.clone(),
                    status: snapshot.status,
                    current: snapshot.progress.current,
                    total: snapshot.progress.total,
                });

                if self.fail_on.as_deref() == Some(title.as_str()) {
                    return Err(Self::failure());
                }

                Ok(serde_json::json!({
                    "title": title,
                    "authors": "X",
                    "year": "2020",
                    "problem": format!("p-{}", title),
                    "methodology": "m1",
                    "findings": "f1",
                    "critique": "c1"
                })
                .to_string())
            }
            None => {
                self.calls.lock().unwrap().push(Observed::Synthesis {
                    status: snapshot.status,
                });
                if self.fail_synthesis {
                    return Err(Self::failure());
                }
                Ok(SYNTHESIS_RESPONSE.to_string())
            }
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// 在目录中写入一个"PDF"，内容即标题
pub fn write_pdf(dir: &Path, title: &str) -> PathBuf {
    let path = dir.join(format!("{}.pdf", title));
    std::fs::write(&path, title.as_bytes()).unwrap();
    path
}
