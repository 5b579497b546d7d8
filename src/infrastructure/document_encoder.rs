//! 文档编码器 - 基础设施层
//!
//! 把上传的二进制文档一次性读入并编码为可放入请求体的 base64 文本

use crate::error::FileError;
use crate::models::UploadedDocument;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

/// 编码后的文档载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub mime_type: String,
    /// 纯 base64 内容（不含 `data:...;base64,` 前缀）
    pub data: String,
}

impl EncodedPayload {
    /// 编码原始字节
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// 读取文档字节并编码
///
/// # 参数
/// - `document`: 已选择的文档
///
/// # 返回
/// 读取失败时返回 `FileError::ReadFailed`
pub async fn encode_document(document: &UploadedDocument) -> Result<EncodedPayload, FileError> {
    let bytes = tokio::fs::read(&document.path)
        .await
        .map_err(|e| FileError::read_failed(document.path.display().to_string(), e))?;

    debug!("编码文档 {}: {} 字节", document.name, bytes.len());

    Ok(EncodedPayload::from_bytes(&document.media_type, &bytes))
}
