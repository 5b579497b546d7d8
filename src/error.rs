use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 文件选择错误
    #[error("选择错误: {0}")]
    Selection(#[from] SelectionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 状态错误（当前状态不允许该操作）
    #[error("状态错误: {0}")]
    State(#[from] StateError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 网络请求失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    RequestFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回非成功状态码
    #[error("LLM API返回错误状态 (模型: {model}): HTTP {status}: {body}")]
    BadStatus {
        model: String,
        status: u16,
        body: String,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 结构化字段校验失败
    #[error("结构化字段无效: {field}")]
    InvalidField { field: &'static str },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 文件选择错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// 超过文件数量上限
    #[error("超过文件数量上限: 已选 {selected}, 新增 {adding}, 上限 {max}")]
    LimitExceeded {
        selected: usize,
        adding: usize,
        max: usize,
    },
    /// 文件序号超出范围
    #[error("文件序号 {index} 超出范围 [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// 没有选择任何文件
    #[error("没有选择任何文件")]
    NoFiles,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("环境变量 GEMINI_API_KEY / API_KEY 均未设置")]
    MissingApiKey,
    /// 配置文件存在但无法读取
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// 当前状态不允许该操作
    #[error("当前状态 {status} 不允许操作: {operation}")]
    NotAllowed {
        status: &'static str,
        operation: &'static str,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::JsonParseFailed { source: err }
    }
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建 LLM 请求失败错误
    pub fn request_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LlmError::RequestFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }
}

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
