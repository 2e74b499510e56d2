use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::AppError;

/// 启动一个独立的无头浏览器实例
///
/// 每次调用都会拉起一个全新的浏览器进程，互相之间完全隔离。
/// 调用方负责在用完后关闭它（见 `RendererSession::close`）。
pub async fn launch_browser(config: &Config) -> Result<Browser> {
    debug!("🚀 启动无头浏览器...");

    let mut args = vec![
        "--disable-gpu".to_string(),           // Windows 无头模式必须禁用 GPU
        "--no-sandbox".to_string(),            // 禁用沙盒，防止权限问题导致的崩溃
        "--disable-dev-shm-usage".to_string(), // 防止共享内存不足
        "--remote-debugging-port=0".to_string(), // 让浏览器自动选择端口
        "--window-size=1920,1080".to_string(),
        format!("--user-agent={}", config.user_agent), // 伪装成普通用户
    ];
    if config.browser_silent {
        // 静默模式：抑制浏览器自身的诊断输出
        args.push("--disable-logging".to_string());
        args.push("--log-level=3".to_string());
    }

    let mut builder = BrowserConfig::builder().new_headless_mode().args(args);
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        AppError::Browser(crate::error::BrowserError::ConfigurationFailed { message: e })
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        AppError::browser_launch_failed(e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(browser)
}
