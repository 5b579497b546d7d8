pub mod article;
pub mod document;
pub mod state;

pub use article::{ArticleAnalysis, ArticleFields, SynthesisFields, SynthesisReport};
pub use document::{UploadedDocument, PDF_MEDIA_TYPE};
pub use state::{ProcessStatus, Progress, SessionSnapshot};
