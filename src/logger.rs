//! 日志初始化
//!
//! 控制台输出受 `RUST_LOG` 控制（默认 info），可选地同时追加写入会话日志文件

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化控制台日志（重复调用无副作用）
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false))
        .try_init();
}

/// 初始化控制台日志，并追加写入 `log_file_path`
///
/// 日志文件无法打开时只输出到控制台
pub fn init_with_file(log_file_path: &str) {
    let file = match OpenOptions::new().create(true).append(true).open(log_file_path) {
        Ok(file) => file,
        Err(e) => {
            init();
            tracing::warn!("无法打开日志文件 {}: {}", log_file_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
}
