use crate::error::ConfigError;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// 默认配置文件名（位于工作目录）
pub const CONFIG_FILE_NAME: &str = "academico_ia.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 单次会话最多可选择的 PDF 数量
    pub max_files: usize,
    /// 导出报告的目录
    pub output_dir: String,
    /// 会话日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    /// API 密钥只从环境变量读取，不写入配置文件
    #[serde(skip)]
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_files: 20,
            output_dir: ".".to_string(),
            output_log_file: "academico_ia.log".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model_name: "gemini-3-pro-preview".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → 工作目录下的 TOML 文件（可选）→ 环境变量中的密钥
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE_NAME))?;
        config.llm_api_key = api_key_from_env().ok_or(ConfigError::MissingApiKey)?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    ///
    /// 只有文件不存在时返回默认值，其他读取错误（权限、非 UTF-8 等）都会上报
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::FileReadFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::from_toml_str(&content).map_err(|source| ConfigError::FileParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 解析 TOML 文本，缺失字段取默认值
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// 读取 API 密钥，`GEMINI_API_KEY` 优先，其次 `API_KEY`
fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.max_files, 20);
        assert_eq!(config.llm_model_name, "gemini-3-pro-preview");
        assert!(config.llm_api_key.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            output_dir = "relatorios"
            llm_model_name = "gemini-2.5-pro"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, "relatorios");
        assert_eq!(config.llm_model_name, "gemini-2.5-pro");
        assert_eq!(config.max_files, 20);
    }

    #[test]
    fn test_api_key_is_not_read_from_toml() {
        let config = Config::from_toml_str(r#"llm_api_key = "segredo""#);
        // 未知字段被忽略，密钥保持为空
        assert!(config.map(|c| c.llm_api_key.is_empty()).unwrap_or(true));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = Config::from_file(Path::new("nao_existe/academico_ia.toml")).unwrap();
        assert_eq!(config.max_files, 20);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "max_files = \"muitos\"").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileParseFailed { .. }));
    }

    #[test]
    fn test_unreadable_file_is_not_replaced_by_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let binary = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        let err = Config::from_file(&binary).unwrap_err();
        assert!(matches!(err, ConfigError::FileReadFailed { .. }));

        // 同名目录也无法作为配置文件读取
        let err = Config::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileReadFailed { .. }));
    }
}
