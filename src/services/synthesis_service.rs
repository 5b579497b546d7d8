//! 综合服务 - 业务能力层
//!
//! 只负责"跨文章综合"能力：比较矩阵、叙述综合、冲突与分歧

use crate::error::{AppError, LlmError};
use crate::infrastructure::{GenerationRequest, GenerativeModel, Part, ResponseSchema};
use crate::models::{ArticleAnalysis, SynthesisFields};
use std::sync::Arc;
use tracing::debug;

const SYNTHESIS_PROMPT: &str = "Com base nas análises individuais abaixo de vários artigos acadêmicos, gere:
1. Uma MATRIZ DE SÍNTESE COMPARATIVA em formato de Tabela Markdown com as colunas: [Artigo (Título Curto)] | [Objetivo] | [Metodologia] | [Principais Resultados] | [Limitações/Gaps].
2. Uma SÍNTESE NARRATIVA consolidando o conhecimento da área.
3. Uma seção de CONFLITOS E DIVERGÊNCIAS, identificando onde os autores concordam e onde há discordâncias teóricas ou metodológicas.

Mantenha um tom acadêmico rigoroso e use Idioma Português.

ANÁLISES:
";

const FIELD_DESCRIPTIONS: [(&str, Option<&str>); 3] = [
    ("matrix", Some("Tabela Markdown da matriz")),
    ("narrative", Some("Texto da síntese narrativa")),
    ("conflicts", Some("Texto sobre conflitos e divergências")),
];

/// 综合服务
///
/// 职责：
/// - 把全部单篇分析序列化为文本
/// - 请求三段综合文本并校验
/// - 不构造报告，不关心状态
pub struct SynthesisService {
    model: Arc<dyn GenerativeModel>,
}

impl SynthesisService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// 生成综合文本
    ///
    /// # 参数
    /// - `analyses`: 按上传顺序排列的全部分析
    pub async fn synthesize(&self, analyses: &[ArticleAnalysis]) -> Result<SynthesisFields, AppError> {
        let prompt = build_synthesis_prompt(analyses);
        debug!("综合提示词长度: {} 字符, 文章数: {}", prompt.len(), analyses.len());

        let request = GenerationRequest {
            parts: vec![Part::Text(prompt)],
            schema: ResponseSchema::described_strings(&FIELD_DESCRIPTIONS),
        };

        let response = self.model.generate_json(request).await?;
        let fields: SynthesisFields = serde_json::from_str(&response).map_err(LlmError::from)?;
        Ok(fields.validate()?)
    }
}

/// 把单篇分析序列化为紧凑文本块，块之间以空行分隔
pub fn serialize_analyses(analyses: &[ArticleAnalysis]) -> String {
    analyses
        .iter()
        .enumerate()
        .map(|(i, a)| {
            format!(
                "Artigo {}:\nTítulo: {}\nObjetivo/Problema: {}\nMetodologia: {}\nResultados: {}\nCrítica: {}",
                i + 1,
                a.title,
                a.problem,
                a.methodology,
                a.findings,
                a.critique
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_synthesis_prompt(analyses: &[ArticleAnalysis]) -> String {
    format!("{}{}", SYNTHESIS_PROMPT, serialize_analyses(analyses))
}
