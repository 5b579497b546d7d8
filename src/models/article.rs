use crate::error::LlmError;
use serde::{Deserialize, Serialize};

/// 单篇文章的结构化分析结果
///
/// 每个文档成功分析后创建一次，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    /// 本地生成的唯一标识
    pub id: String,
    /// 源文件名
    pub filename: String,
    pub title: String,
    pub authors: String,
    /// 出版年份（自由文本，不做数字校验）
    pub year: String,
    pub problem: String,
    pub methodology: String,
    pub findings: String,
    pub critique: String,
}

impl ArticleAnalysis {
    /// 由模型返回的字段、文件名组装完整记录，并生成新标识
    pub fn from_fields(fields: ArticleFields, filename: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            filename: filename.into(),
            title: fields.title,
            authors: fields.authors,
            year: fields.year,
            problem: fields.problem,
            methodology: fields.methodology,
            findings: fields.findings,
            critique: fields.critique,
        }
    }
}

/// 模型返回的七个分析字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArticleFields {
    pub title: String,
    pub authors: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: String,
    pub problem: String,
    pub methodology: String,
    pub findings: String,
    pub critique: String,
}

impl ArticleFields {
    /// 字段名，顺序与提示词一致
    pub const NAMES: [&'static str; 7] = [
        "title",
        "authors",
        "year",
        "problem",
        "methodology",
        "findings",
        "critique",
    ];

    /// 校验所有字段非空
    pub fn validate(self) -> Result<Self, LlmError> {
        let values = [
            &self.title,
            &self.authors,
            &self.year,
            &self.problem,
            &self.methodology,
            &self.findings,
            &self.critique,
        ];
        ensure_filled(&Self::NAMES, &values)?;
        Ok(self)
    }
}

/// 综合请求返回的三个文本
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynthesisFields {
    pub matrix: String,
    pub narrative: String,
    pub conflicts: String,
}

impl SynthesisFields {
    pub const NAMES: [&'static str; 3] = ["matrix", "narrative", "conflicts"];

    /// 校验所有字段非空
    pub fn validate(self) -> Result<Self, LlmError> {
        ensure_filled(&Self::NAMES, &[&self.matrix, &self.narrative, &self.conflicts])?;
        Ok(self)
    }
}

/// 会话的最终汇总报告
///
/// 只在流程进入 completed 状态时存在，每次运行整体替换
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    /// 按上传顺序排列的单篇分析
    pub analyses: Vec<ArticleAnalysis>,
    /// Markdown 表格形式的比较矩阵
    pub matrix_markdown: String,
    pub narrative_synthesis: String,
    pub conflicts: String,
}

impl SynthesisReport {
    pub fn new(analyses: Vec<ArticleAnalysis>, fields: SynthesisFields) -> Self {
        Self {
            analyses,
            matrix_markdown: fields.matrix,
            narrative_synthesis: fields.narrative,
            conflicts: fields.conflicts,
        }
    }
}

fn ensure_filled(names: &[&'static str], values: &[&String]) -> Result<(), LlmError> {
    match names
        .iter()
        .zip(values)
        .find(|(_, value)| value.trim().is_empty())
    {
        Some((field, _)) => Err(LlmError::InvalidField { field: *field }),
        None => Ok(()),
    }
}

// 年份可能以字符串或整数返回
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer representing a year")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(YearVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "title": "A",
            "authors": "X",
            "year": "2020",
            "problem": "p1",
            "methodology": "m1",
            "findings": "f1",
            "critique": "c1"
        })
    }

    #[test]
    fn test_fields_parse_and_validate() {
        let fields: ArticleFields = serde_json::from_value(sample_json()).unwrap();
        let fields = fields.validate().unwrap();
        assert_eq!(fields.title, "A");
        assert_eq!(fields.year, "2020");
    }

    #[test]
    fn test_numeric_year_is_accepted() {
        let mut json = sample_json();
        json["year"] = serde_json::json!(2019);
        let fields: ArticleFields = serde_json::from_value(json).unwrap();
        assert_eq!(fields.year, "2019");
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("critique");
        assert!(serde_json::from_value::<ArticleFields>(json).is_err());
    }

    #[test]
    fn test_blank_field_fails_validation() {
        let mut json = sample_json();
        json["methodology"] = serde_json::json!("   ");
        let fields: ArticleFields = serde_json::from_value(json).unwrap();
        match fields.validate() {
            Err(LlmError::InvalidField { field }) => assert_eq!(field, "methodology"),
            other => panic!("期望 InvalidField，实际为 {:?}", other),
        }
    }

    #[test]
    fn test_from_fields_generates_distinct_ids() {
        let fields: ArticleFields = serde_json::from_value(sample_json()).unwrap();
        let a = ArticleAnalysis::from_fields(fields.clone(), "a.pdf");
        let b = ArticleAnalysis::from_fields(fields, "a.pdf");
        assert_ne!(a.id, b.id);
        assert_eq!(a.filename, "a.pdf");
    }

    #[test]
    fn test_synthesis_fields_validation() {
        let fields = SynthesisFields {
            matrix: "| A |".to_string(),
            narrative: String::new(),
            conflicts: "c".to_string(),
        };
        assert!(matches!(
            fields.validate(),
            Err(LlmError::InvalidField { field: "narrative" })
        ));
    }
}
