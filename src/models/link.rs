//! 链接与排序键
//!
//! 讨论页 URL 中内嵌 `topic-{N}-question-{M}` 两个整数，
//! 它们共同构成题目的全序排序键。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 题目排序键：按 (topic, question) 字典序全序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionKey {
    pub topic: u32,
    pub question: u32,
}

/// 一条待抓取的讨论链接及其排序键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub key: QuestionKey,
    pub link: String,
}

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"topic-(\d+)-question-(\d+)").unwrap());

/// 从 URL 中解析排序键
///
/// 纯函数，无 I/O；不匹配的链接返回 None，由调用方丢弃（过滤而非错误）。
pub fn resolve_key(url: &str) -> Option<QuestionKey> {
    let caps = KEY_RE.captures(url)?;
    let topic = caps.get(1)?.as_str().parse().ok()?;
    let question = caps.get(2)?.as_str().parse().ok()?;
    Some(QuestionKey { topic, question })
}

/// 解析、过滤并排序一批链接
///
/// 无法解析出键的链接被静默丢弃；结果按 (topic, question) 升序。
pub fn keyed_items<I>(links: I) -> Vec<LinkItem>
where
    I: IntoIterator<Item = String>,
{
    let mut items: Vec<LinkItem> = links
        .into_iter()
        .filter_map(|link| resolve_key(&link).map(|key| LinkItem { key, link }))
        .collect();
    items.sort_by_key(|item| item.key);
    items
}
