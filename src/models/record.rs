//! 题目记录与聚合
//!
//! 每条链接恰好产出一条记录；抓取或提取失败时产出降级记录
//! （哨兵题干 + 空选项 + 空答案），这是合法的终态而不是错误。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::link::QuestionKey;

/// 降级记录的哨兵题干，会原样出现在导出文件里
pub const DEGRADED_SENTINEL: &str = "Question content not found (page blocked or fetch failed)";

/// 一道题的完整抓取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub key: QuestionKey,
    pub link: String,
    pub question_text: String,
    pub choices: Vec<String>,
    pub suggested_answer: String,
}

impl QuestionRecord {
    /// 构造降级记录，保留原始键和链接以便聚合时仍能归位
    pub fn degraded(key: QuestionKey, link: String) -> Self {
        Self {
            key,
            link,
            question_text: DEGRADED_SENTINEL.to_string(),
            choices: Vec::new(),
            suggested_answer: String::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.question_text == DEGRADED_SENTINEL
    }
}

/// 聚合结果：topic -> 按 question 升序排列的记录
///
/// BTreeMap 的迭代顺序就是导出时的 topic 升序。
pub type ResultSet = BTreeMap<u32, Vec<QuestionRecord>>;

/// 按 topic 分组并在组内按 question 升序排序
///
/// 纯划分，与抓取完成顺序无关。同键记录全部保留（见 DESIGN.md）。
pub fn aggregate(records: Vec<QuestionRecord>) -> ResultSet {
    let mut set: ResultSet = BTreeMap::new();
    for record in records {
        set.entry(record.key.topic).or_default().push(record);
    }
    for group in set.values_mut() {
        group.sort_by_key(|record| record.key.question);
    }
    set
}
