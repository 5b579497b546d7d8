//! 单篇分析服务 - 业务能力层
//!
//! 只负责"分析一篇文章"能力，不关心流程

use crate::error::AppError;
use crate::infrastructure::{
    encode_document, GenerationRequest, GenerativeModel, Part, ResponseSchema,
};
use crate::models::{ArticleAnalysis, ArticleFields, UploadedDocument};
use std::sync::Arc;
use tracing::debug;

/// 单篇分析指令
const ANALYSIS_PROMPT: &str = "Analise este artigo acadêmico rigorosamente e extraia as seguintes informações em Português:
1. Título do Artigo
2. Autores
3. Ano de Publicação
4. Problema/Lacuna (O que o artigo busca resolver?)
5. Metodologia (Desenho, amostra, métodos)
6. Achados Principais (Resultados diretos e significância)
7. Crítica (Breve avaliação da robustez do estudo)

Retorne os dados estritamente no formato JSON solicitado.";

/// 单篇分析服务
///
/// 职责：
/// - 编码单个文档并请求结构化分析
/// - 校验返回字段
/// - 只处理单个文档
/// - 不出现进度或状态
pub struct AnalysisService {
    model: Arc<dyn GenerativeModel>,
}

impl AnalysisService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// 分析单个文档
    ///
    /// # 参数
    /// - `document`: 待分析的 PDF
    ///
    /// # 返回
    /// 返回带有新标识和原文件名的分析记录
    pub async fn analyze(&self, document: &UploadedDocument) -> Result<ArticleAnalysis, AppError> {
        let payload = encode_document(document).await?;

        let request = GenerationRequest {
            parts: vec![
                Part::Document(payload),
                Part::Text(ANALYSIS_PROMPT.to_string()),
            ],
            schema: ResponseSchema::required_strings(&ArticleFields::NAMES),
        };

        let response = self.model.generate_json(request).await?;
        debug!("文档 {} 返回 {} 字符", document.name, response.len());

        let fields = parse_fields(&response)?;
        Ok(ArticleAnalysis::from_fields(fields, &document.name))
    }
}

fn parse_fields(response: &str) -> Result<ArticleFields, AppError> {
    let fields: ArticleFields =
        serde_json::from_str(response).map_err(crate::error::LlmError::from)?;
    Ok(fields.validate()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录请求并返回固定响应
    struct RecordingModel {
        response: Result<String, ()>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate_json(&self, request: GenerationRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.response.clone().map_err(|_| LlmError::EmptyResponse {
                model: "fake".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    fn write_pdf(dir: &tempfile::TempDir, name: &str) -> UploadedDocument {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 conteudo").unwrap();
        UploadedDocument::from_path(path).unwrap()
    }

    const VALID: &str = r#"{"title":"A","authors":"X","year":"2020","problem":"p1","methodology":"m1","findings":"f1","critique":"c1"}"#;

    #[tokio::test]
    async fn test_analyze_builds_record() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_pdf(&dir, "silva.pdf");
        let model = Arc::new(RecordingModel {
            response: Ok(VALID.to_string()),
            requests: Mutex::new(Vec::new()),
        });

        let service = AnalysisService::new(model.clone());
        let analysis = service.analyze(&doc).await.unwrap();

        assert_eq!(analysis.filename, "silva.pdf");
        assert_eq!(analysis.title, "A");
        assert_eq!(analysis.critique, "c1");
        assert!(!analysis.id.is_empty());

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(matches!(requests[0].parts[0], Part::Document(_)));
        assert!(matches!(&requests[0].parts[1], Part::Text(t) if t.contains("Crítica")));
        assert_eq!(requests[0].schema.required().len(), 7);
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_response() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_pdf(&dir, "a.pdf");
        let service = AnalysisService::new(Arc::new(RecordingModel {
            response: Ok(r#"{"title":"A"}"#.to_string()),
            requests: Mutex::new(Vec::new()),
        }));

        let err = service.analyze(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::JsonParseFailed { .. })));
    }

    #[tokio::test]
    async fn test_analyze_propagates_model_failure() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_pdf(&dir, "a.pdf");
        let service = AnalysisService::new(Arc::new(RecordingModel {
            response: Err(()),
            requests: Mutex::new(Vec::new()),
        }));

        let err = service.analyze(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_document_skips_request() {
        let model = Arc::new(RecordingModel {
            response: Ok(VALID.to_string()),
            requests: Mutex::new(Vec::new()),
        });
        let service = AnalysisService::new(model.clone());
        let dir = tempfile::tempdir().unwrap();
        let doc = write_pdf(&dir, "a.pdf");
        std::fs::remove_file(&doc.path).unwrap();

        let err = service.analyze(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::File(_)));
        assert!(model.requests.lock().unwrap().is_empty());
    }
}
