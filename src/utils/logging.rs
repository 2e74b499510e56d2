/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认 info 级别，可用 RUST_LOG 环境变量覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // 重复初始化（如多个测试各自调用）时静默忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 讨论页并行抓取模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录链接就绪信息
pub fn log_links_ready(total: usize) {
    info!("✓ 解析出 {} 条待抓取链接，已按 (topic, question) 排序", total);
}

/// 打印最终统计信息
pub fn print_final_stats(
    healthy: usize,
    degraded: usize,
    total: usize,
    text_path: &str,
    anki_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部抓取完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", healthy, total);
    info!("❌ 降级: {}", degraded);
    info!("{}", "=".repeat(60));
    info!("\n文本导出已保存至: {}", text_path);
    info!("卡片导出已保存至: {}", anki_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
