pub mod article_ctx;
pub mod run_flow;

pub use article_ctx::ArticleCtx;
pub use run_flow::{RunEvent, RunFlow};
