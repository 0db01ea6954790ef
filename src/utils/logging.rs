//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 后端地址: {}", config.backend_base_url);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("📥 导出路径: {}", config.export_path().display());
    info!("{}", "=".repeat(60));
}

/// 记录一次请求的开始
///
/// # 参数
/// - `endpoint`: 接口路径
/// - `summary`: 请求摘要
pub fn log_request(endpoint: &str, summary: &str) {
    info!("📡 POST {} | {}", endpoint, truncate_text(summary, 80));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
