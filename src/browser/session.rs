//! 渲染会话 - 基础设施层
//!
//! 一个会话 = 一个独立的浏览器实例 + 一个页面。
//! 会话持有稀缺资源（浏览器进程），只暴露导航 / 等待 / 读内容 / 执行 JS 的能力，
//! 不认识链接和题目；用完必须显式 `close()` 回收进程。

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::browser::headless;
use crate::config::Config;
use crate::error::AppError;

/// 渲染等待策略
///
/// 导航之后必须等待客户端 JS 和反爬检查跑完才能读内容。
/// 固定等待是原始做法；轮询等待在元素出现后立即返回，超时则按当前内容继续。
#[derive(Clone, Debug)]
pub enum SettlePolicy {
    /// 固定等待一段时间
    FixedDelay(Duration),
    /// 轮询直到指定选择器命中，或超时
    PollSelector {
        selector: String,
        timeout: Duration,
        interval: Duration,
    },
}

impl SettlePolicy {
    /// 根据配置选择等待策略
    pub fn from_config(config: &Config) -> Self {
        match &config.settle_selector {
            Some(selector) => SettlePolicy::PollSelector {
                selector: selector.clone(),
                timeout: Duration::from_millis(config.settle_ms),
                interval: Duration::from_millis(config.settle_poll_interval_ms),
            },
            None => SettlePolicy::FixedDelay(Duration::from_millis(config.settle_ms)),
        }
    }
}

/// 渲染会话
///
/// 职责：
/// - 独占一个无头浏览器实例和页面
/// - 暴露 navigate / settle / content / eval 能力
/// - 不认识链接、题目等业务概念
pub struct RendererSession {
    browser: Browser,
    page: Page,
    settle: SettlePolicy,
}

impl RendererSession {
    /// 打开一个新会话（启动浏览器 + 创建空白页面）
    pub async fn open(config: &Config) -> Result<Self> {
        let mut browser = headless::launch_browser(config).await?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // 页面创建失败时同样要回收浏览器进程
                let _ = browser.close().await;
                let _ = browser.wait().await;
                return Err(AppError::page_creation_failed(e).into());
            }
        };

        Ok(Self {
            browser,
            page,
            settle: SettlePolicy::from_config(config),
        })
    }

    /// 导航到指定 URL
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        Ok(())
    }

    /// 按策略等待页面渲染完成
    pub async fn settle(&self) -> Result<()> {
        match &self.settle {
            SettlePolicy::FixedDelay(delay) => {
                sleep(*delay).await;
                Ok(())
            }
            SettlePolicy::PollSelector {
                selector,
                timeout,
                interval,
            } => {
                let js = format!(
                    "document.querySelector({}) !== null",
                    serde_json::to_string(selector).map_err(AppError::from)?
                );
                let deadline = tokio::time::Instant::now() + *timeout;
                while tokio::time::Instant::now() < deadline {
                    let found = self
                        .eval(js.clone())
                        .await
                        .ok()
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    if found {
                        return Ok(());
                    }
                    sleep(*interval).await;
                }
                // 超时不视为错误，按当前内容继续提取
                debug!("等待选择器 {} 超时", selector);
                Ok(())
            }
        }
    }

    /// 读取渲染后的完整页面内容
    pub async fn content(&self) -> Result<String> {
        let markup = self
            .page
            .content()
            .await
            .map_err(AppError::content_read_failed)?;
        Ok(markup)
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 关闭会话并回收浏览器进程
    ///
    /// 在会话的每条退出路径上都必须调用，不能依赖析构回收。
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        self.browser.wait().await?;
        Ok(())
    }
}
