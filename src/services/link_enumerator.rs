//! 链接枚举服务 - 业务能力层
//!
//! ## 职责
//!
//! 1. 打开厂商讨论区第 1 页，读取总页数指示器
//! 2. 用同一个渲染会话串行走完所有列表页（每页等待渲染）
//! 3. 按搜索词（大小写不敏感的子串匹配）过滤讨论链接
//! 4. 返回按 URL 去重后的链接集合
//!
//! 页数指示器缺失（站点改版或请求被拦截）对枚举是致命的：
//! 记一条 DiscoveryError 日志并返回空集合，由上层向用户提示"未找到页面"。
//! 无论哪条退出路径，会话都会被释放。

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::Result;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::browser::RendererSession;
use crate::config::Config;
use crate::error::AppError;

static PAGE_INDICATOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.discussion-list-page-indicator").unwrap());
static STRONG_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong").unwrap());
static DISCUSSION_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.discussion-link").unwrap());

/// 链接枚举服务
pub struct LinkEnumerator {
    config: Config,
}

impl LinkEnumerator {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 枚举厂商讨论区里所有匹配搜索词的讨论链接
    pub async fn enumerate(&self, provider: &str, search_term: &str) -> Result<HashSet<String>> {
        let session = RendererSession::open(&self.config).await?;

        let result = self.enumerate_with(&session, provider, search_term).await;

        // 会话必须在每条退出路径上释放
        if let Err(e) = session.close().await {
            warn!("释放枚举会话失败: {}", e);
        }

        result
    }

    async fn enumerate_with(
        &self,
        session: &RendererSession,
        provider: &str,
        search_term: &str,
    ) -> Result<HashSet<String>> {
        let listing_url = self.listing_url(provider);
        info!("📖 打开讨论区列表: {}", listing_url);

        session.navigate(&listing_url).await?;
        session.settle().await?;
        let markup = session.content().await?;

        let Some(num_pages) = parse_page_count(&markup) else {
            let err = AppError::page_indicator_missing(provider);
            warn!("⚠️ {}", err);
            return Ok(HashSet::new());
        };

        info!("✓ 共 {} 页", num_pages);
        if num_pages == 0 {
            return Ok(HashSet::new());
        }

        let origin = site_origin(&self.config.base_url);
        let mut links = HashSet::new();

        for page in 1..=num_pages {
            let page_url = format!("{}{}/", listing_url, page);
            debug!("扫描第 {}/{} 页: {}", page, num_pages, page_url);

            // 单页失败只影响该页，继续扫描剩余页
            if let Err(e) = session.navigate(&page_url).await {
                warn!("第 {} 页导航失败: {}", page, e);
                continue;
            }
            if let Err(e) = session.settle().await {
                warn!("第 {} 页等待渲染失败: {}", page, e);
                continue;
            }
            let page_markup = match session.content().await {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("第 {} 页读取内容失败: {}", page, e);
                    continue;
                }
            };

            let page_links = collect_matching_links(&page_markup, search_term, origin);
            debug!("第 {} 页命中 {} 条链接", page, page_links.len());
            links.extend(page_links);

            info!("📥 链接收集进度: {}/{} 页，已有 {} 条", page, num_pages, links.len());
        }

        Ok(links)
    }

    fn listing_url(&self, provider: &str) -> String {
        format!(
            "{}/{}/",
            self.config.base_url.trim_end_matches('/'),
            provider.to_lowercase()
        )
    }
}

/// 从第 1 页解析总页数：指示器里第二个 <strong> 是总页数
fn parse_page_count(markup: &str) -> Option<u32> {
    let document = Html::parse_document(markup);
    let indicator = document.select(&PAGE_INDICATOR_SEL).next()?;
    let strongs: Vec<_> = indicator.select(&STRONG_SEL).collect();
    strongs
        .get(1)?
        .text()
        .collect::<String>()
        .trim()
        .parse()
        .ok()
}

/// 收集一页里所有匹配搜索词的讨论链接（绝对化后的 href）
fn collect_matching_links(markup: &str, search_term: &str, origin: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    document
        .select(&DISCUSSION_LINK_SEL)
        .filter_map(|anchor| {
            let text: String = anchor.text().collect();
            if !matches_search(&text, search_term) {
                return None;
            }
            let href = anchor.value().attr("href")?;
            Some(absolutize(origin, href))
        })
        .collect()
}

/// 大小写不敏感的子串匹配
fn matches_search(anchor_text: &str, search_term: &str) -> bool {
    anchor_text
        .to_lowercase()
        .contains(&search_term.to_lowercase())
}

/// 站内相对链接补全为绝对 URL
fn absolutize(origin: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        href.to_string()
    }
}

/// 从 base_url 取出站点源（scheme + host）
fn site_origin(base_url: &str) -> &str {
    let scheme_end = base_url.find("://").map(|i| i + 3).unwrap_or(0);
    match base_url[scheme_end..].find('/') {
        Some(i) => &base_url[..scheme_end + i],
        None => base_url,
    }
}
