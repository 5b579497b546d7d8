//! Gemini 客户端 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，通过 `generateContent` 接口实现 `GenerativeModel`

use super::generative::{GenerationRequest, GenerativeModel, Part, ResponseSchema};
use crate::config::Config;
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Gemini 客户端
///
/// 职责：
/// - 持有 HTTP 客户端和凭证
/// - 把 `GenerationRequest` 转成 Gemini 请求体
/// - 从响应中取出文本
/// - 不认识文章或报告
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_json(&self, request: GenerationRequest) -> Result<String, LlmError> {
        let body = RequestBody::from(&request);
        let url = self.endpoint_url();

        debug!("调用 Gemini API，模型: {}, 片段数: {}", self.model_name, request.parts.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 调用失败: {}", e);
                LlmError::request_failed(&self.model_name, e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::request_failed(&self.model_name, e))?;

        if !status.is_success() {
            return Err(LlmError::BadStatus {
                model: self.model_name.clone(),
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("Gemini API 调用成功");

        extract_text(&text, &self.model_name)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

// ========== 请求体 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    contents: Vec<ContentBody<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct ContentBody<'a> {
    parts: Vec<PartBody<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PartBody<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a ResponseSchema,
}

impl<'a> From<&'a GenerationRequest> for RequestBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Document(payload) => PartBody::Inline {
                    inline_data: InlineData {
                        mime_type: &payload.mime_type,
                        data: &payload.data,
                    },
                },
                Part::Text(text) => PartBody::Text { text },
            })
            .collect();

        Self {
            contents: vec![ContentBody { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
            },
        }
    }
}

// ========== 响应体 ==========

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// 拼接第一个候选的所有文本片段
fn extract_text(body: &str, model: &str) -> Result<String, LlmError> {
    let response: ResponseBody = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse {
            model: model.to_string(),
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::document_encoder::EncodedPayload;

    fn create_test_client() -> GeminiClient {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: "https://example.test/v1beta/".to_string(),
            ..Config::default()
        };
        GeminiClient::new(&config)
    }

    #[test]
    fn test_endpoint_url() {
        let client = create_test_client();
        assert_eq!(
            client.endpoint_url(),
            "https://example.test/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_request_body_with_document() {
        let request = GenerationRequest {
            parts: vec![
                Part::Document(EncodedPayload::from_bytes("application/pdf", b"%PDF")),
                Part::Text("Analise".to_string()),
            ],
            schema: ResponseSchema::required_strings(&["title"]),
        };

        let json = serde_json::to_value(RequestBody::from(&request)).unwrap();
        let parts = &json["contents"][0]["parts"];

        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERg==");
        assert_eq!(parts[1]["text"], "Analise");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"],
            serde_json::json!(["title"])
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"\"b\"}"}]}}]}"#;
        assert_eq!(extract_text(body, "m").unwrap(), r#"{"a":"b"}"#);
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let err = extract_text(r#"{"candidates":[]}"#, "m").unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));

        let err = extract_text(r#"{}"#, "m").unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }

    #[test]
    fn test_extract_text_invalid_json() {
        let err = extract_text("<html>", "m").unwrap_err();
        assert!(matches!(err, LlmError::JsonParseFailed { .. }));
    }

    /// 需要真实的 GEMINI_API_KEY
    #[tokio::test]
    #[ignore]
    async fn test_generate_json_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::load().expect("需要设置 GEMINI_API_KEY");
        let client = GeminiClient::new(&config);

        let request = GenerationRequest {
            parts: vec![Part::Text("Responda com a palavra 'ok'.".to_string())],
            schema: ResponseSchema::required_strings(&["answer"]),
        };

        let result = client.generate_json(request).await;
        match result {
            Ok(text) => {
                println!("LLM 响应: {}", text);
                assert!(!text.is_empty());
            }
            Err(e) => panic!("测试失败: {}", e),
        }
    }
}
