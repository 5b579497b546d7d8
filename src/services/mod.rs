pub mod analysis_service;
pub mod synthesis_service;

pub use analysis_service::AnalysisService;
pub use synthesis_service::{serialize_analyses, SynthesisService};
