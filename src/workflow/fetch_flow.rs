//! 单条链接的抓取流程 - 流程层
//!
//! 核心职责：定义"一条链接"的完整处理流程
//!
//! 流程顺序：
//! 1. 打开全新的渲染会话（独立浏览器实例）
//! 2. 导航 → 等待渲染 → 读取页面内容
//! 3. 交给 RecordExtractor 提取题目
//! 4. 无论成败都释放会话
//!
//! 本流程永不失败：任何一步出错都降级为哨兵记录并保留原始键和链接，
//! 调用方不需要用异常分支判断"这条是否成功"。

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::RendererSession;
use crate::config::Config;
use crate::models::link::LinkItem;
use crate::models::record::QuestionRecord;
use crate::services::RecordExtractor;
use crate::utils::logging;

/// 单条链接的抓取流程
///
/// - 每次 run 独占一个全新的渲染会话，用完即关
/// - 不出现 Vec<LinkItem>，不关心并发
#[derive(Clone)]
pub struct FetchFlow {
    config: Config,
}

impl FetchFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 抓取一条链接，总是恰好产出一条记录
    pub async fn run(&self, item: &LinkItem) -> QuestionRecord {
        match self.try_fetch(item).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "[{}-{}] ⚠️ 抓取失败，记为降级记录: {}",
                    item.key.topic, item.key.question, e
                );
                QuestionRecord::degraded(item.key, item.link.clone())
            }
        }
    }

    async fn try_fetch(&self, item: &LinkItem) -> Result<QuestionRecord> {
        let session = RendererSession::open(&self.config).await?;

        // 先收集结果，保证关会话发生在每条退出路径上
        let outcome = self.render_page(&session, item).await;

        if let Err(e) = session.close().await {
            warn!(
                "[{}-{}] 释放会话失败: {}",
                item.key.topic, item.key.question, e
            );
        }

        let markup = outcome?;
        let record = RecordExtractor::new().extract(&markup, item.key, &item.link);

        if record.is_degraded() {
            info!(
                "[{}-{}] ⚠️ 页面无题目容器（可能被拦截）",
                item.key.topic, item.key.question
            );
        } else if self.config.verbose_logging {
            info!(
                "[{}-{}] 题干预览: {}",
                item.key.topic,
                item.key.question,
                logging::truncate_text(&record.question_text, 60)
            );
        }

        Ok(record)
    }

    async fn render_page(&self, session: &RendererSession, item: &LinkItem) -> Result<String> {
        session.navigate(&item.link).await?;
        session.settle().await?;
        session.content().await
    }
}
