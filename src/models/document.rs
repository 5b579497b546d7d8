use std::path::{Path, PathBuf};

/// 唯一接受的文档类型
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 用户选择的待分析文档
///
/// 选择时只记录路径和元数据，字节在编码时一次性读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// 文件路径
    pub path: PathBuf,
    /// 显示名称（文件名）
    pub name: String,
    /// 媒体类型
    pub media_type: String,
}

impl UploadedDocument {
    /// 根据路径创建文档
    ///
    /// 非 PDF 文件、不存在的路径和目录都返回 `None`，
    /// 选择中的文档都是可读取的普通文件
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let media_type = media_type_for(path)?;
        if !is_regular_file(path) {
            return None;
        }
        let name = path.file_name()?.to_string_lossy().to_string();

        Some(Self {
            path: path.to_path_buf(),
            name,
            media_type: media_type.to_string(),
        })
    }
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// 按扩展名推断媒体类型（只识别 PDF）
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    ext.eq_ignore_ascii_case("pdf").then_some(PDF_MEDIA_TYPE)
}
