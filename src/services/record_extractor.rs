//! 题目提取服务 - 业务能力层
//!
//! 只负责"从渲染后的页面内容提取一道题"，不做任何 I/O，
//! 并且永不失败：任何解析不一致都降级为哨兵记录，保留原始键和链接。

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::link::QuestionKey;
use crate::models::record::QuestionRecord;

/// 题干 <p> 缺失时的占位文本（题目容器存在但内容异常）
pub const QUESTION_TEXT_MISSING: &str = "Question text not found.";
/// 答案标记缺失时的占位文本
pub const ANSWER_NOT_FOUND: &str = "Not found";

static QUESTION_BODY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.question-body").unwrap());
static QUESTION_TEXT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.card-text").unwrap());
static CHOICES_CONTAINER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.question-choices-container").unwrap());
static CHOICE_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.multi-choice-item").unwrap());
static ANSWER_CONTAINER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.question-answer").unwrap());
static CORRECT_ANSWER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.correct-answer").unwrap());

/// 选项文本里的投票噪声（如 "Most Voted" 角标）
static VOTE_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Most Voted").unwrap());

/// 题目提取服务
///
/// 职责：
/// - 输入一个页面的渲染结果，输出一条 QuestionRecord
/// - 题目容器缺失视为"被拦截或不存在"，产出降级记录
/// - 选项容器缺失只产出空选项列表，不算失败
/// - 不出现 Vec<LinkItem>，不关心并发和流程
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 从渲染后的页面内容提取一道题
    pub fn extract(&self, markup: &str, key: QuestionKey, link: &str) -> QuestionRecord {
        let document = Html::parse_document(markup);

        // 题目容器缺失通常意味着被反爬拦截或页面不存在
        let Some(body) = document.select(&QUESTION_BODY_SEL).next() else {
            debug!("[{}-{}] 未找到题目容器，记为降级记录", key.topic, key.question);
            return QuestionRecord::degraded(key, link.to_string());
        };

        let question_text = body
            .select(&QUESTION_TEXT_SEL)
            .next()
            .map(text_with_line_breaks)
            .unwrap_or_else(|| QUESTION_TEXT_MISSING.to_string());

        let choices = document
            .select(&CHOICES_CONTAINER_SEL)
            .next()
            .map(|container| {
                container
                    .select(&CHOICE_ITEM_SEL)
                    .map(|item| clean_choice_text(&item.text().collect::<String>()))
                    .collect()
            })
            .unwrap_or_default();

        let suggested_answer = document
            .select(&ANSWER_CONTAINER_SEL)
            .next()
            .and_then(|container| container.select(&CORRECT_ANSWER_SEL).next())
            .map(|marker| collapse_whitespace(&marker.text().collect::<String>()))
            .unwrap_or_else(|| ANSWER_NOT_FOUND.to_string());

        QuestionRecord {
            key,
            link: link.to_string(),
            question_text,
            choices,
            suggested_answer,
        }
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 提取元素文本，保留换行结构：各文本节点去除首尾空白后按换行拼接
fn text_with_line_breaks(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 清理选项文本：去除投票噪声，压缩内部空白为单个空格
fn clean_choice_text(raw: &str) -> String {
    let without_noise = VOTE_NOISE_RE.replace_all(raw, "");
    collapse_whitespace(&without_noise)
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> QuestionKey {
        QuestionKey {
            topic: 1,
            question: 7,
        }
    }

    const FULL_PAGE: &str = r#"
        <html><body>
        <div class="question-body">
            <p class="card-text">A company runs workloads on AWS.<br>Which service should the company use?</p>
        </div>
        <div class="question-choices-container">
            <ul>
                <li class="multi-choice-item">A.   Amazon   S3</li>
                <li class="multi-choice-item">B. AWS Lambda <span class="badge">Most Voted</span></li>
            </ul>
        </div>
        <div class="question-answer">
            <span class="correct-answer"> B </span>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_full_record() {
        let record = RecordExtractor::new().extract(FULL_PAGE, key(), "https://e.com/q");
        // <br> 两侧的文本节点按换行拼接
        assert_eq!(
            record.question_text,
            "A company runs workloads on AWS.\nWhich service should the company use?"
        );
        assert_eq!(
            record.choices,
            vec!["A. Amazon S3".to_string(), "B. AWS Lambda".to_string()]
        );
        assert_eq!(record.suggested_answer, "B");
        assert!(!record.is_degraded());
    }

    /// 题目容器缺失 -> 降级记录，空选项、空答案，但键和链接保留
    #[test]
    fn test_extract_missing_body_degrades() {
        let markup = "<html><body><h1>Just a moment...</h1></body></html>";
        let record = RecordExtractor::new().extract(markup, key(), "https://e.com/q");
        assert!(record.is_degraded());
        assert!(record.choices.is_empty());
        assert_eq!(record.suggested_answer, "");
        assert_eq!(record.key, key());
        assert_eq!(record.link, "https://e.com/q");
    }

    /// 选项容器缺失不算失败：选项列表为空即可
    #[test]
    fn test_extract_missing_choices_is_not_failure() {
        let markup = r#"
            <div class="question-body"><p class="card-text">Question?</p></div>
        "#;
        let record = RecordExtractor::new().extract(markup, key(), "https://e.com/q");
        assert!(!record.is_degraded());
        assert_eq!(record.question_text, "Question?");
        assert!(record.choices.is_empty());
        assert_eq!(record.suggested_answer, ANSWER_NOT_FOUND);
    }

    /// 题目容器存在但题干 <p> 缺失 -> 占位题干
    #[test]
    fn test_extract_missing_question_text() {
        let markup = r#"<div class="question-body"><div>other</div></div>"#;
        let record = RecordExtractor::new().extract(markup, key(), "https://e.com/q");
        assert_eq!(record.question_text, QUESTION_TEXT_MISSING);
    }

    #[test]
    fn test_clean_choice_text_strips_vote_noise() {
        assert_eq!(
            clean_choice_text("B. AWS Lambda \n   Most Voted "),
            "B. AWS Lambda"
        );
        assert_eq!(clean_choice_text("A.   Amazon   S3"), "A. Amazon S3");
    }
}
