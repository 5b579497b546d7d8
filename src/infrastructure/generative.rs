//! 生成式模型能力 - 基础设施层
//!
//! 服务层只依赖 `GenerativeModel`，不关心底层是哪个 HTTP 服务

use super::document_encoder::EncodedPayload;
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// 请求中的一个内容片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// 内联文档
    Document(EncodedPayload),
    /// 文本指令
    Text(String),
}

/// 结构化输出约定：一组必填字符串字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: BTreeMap<&'static str, FieldSchema>,
    required: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FieldSchema {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'static str>,
}

impl ResponseSchema {
    /// 所有字段均为必填字符串
    pub fn required_strings(fields: &[&'static str]) -> Self {
        let described: Vec<(&'static str, Option<&'static str>)> =
            fields.iter().map(|f| (*f, None)).collect();
        Self::described_strings(&described)
    }

    /// 带字段说明的必填字符串
    pub fn described_strings(fields: &[(&'static str, Option<&'static str>)]) -> Self {
        let properties = fields
            .iter()
            .map(|(name, description)| {
                (
                    *name,
                    FieldSchema {
                        kind: "STRING",
                        description: *description,
                    },
                )
            })
            .collect();

        Self {
            kind: "OBJECT",
            properties,
            required: fields.iter().map(|(name, _)| *name).collect(),
        }
    }

    /// 必填字段名（按声明顺序）
    pub fn required(&self) -> &[&'static str] {
        &self.required
    }
}

/// 一次生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
    pub schema: ResponseSchema,
}

/// 生成式模型
///
/// 职责：
/// - 提交文档和指令，返回符合 schema 的 JSON 文本
/// - 不认识文章或报告
/// - 不做重试
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// 发送请求并返回原始 JSON 文本
    async fn generate_json(&self, request: GenerationRequest) -> Result<String, LlmError>;

    /// 模型名称（用于日志）
    fn model_name(&self) -> &str;
}
