//! 导出服务 - 业务能力层
//!
//! 把聚合结果写成两种学习材料：
//! - 按 topic 分组的纯文本 dumps 文件
//! - 两列 front/back 的 TSV（单元格为 HTML，可直接导入间隔重复软件）
//!
//! 渲染函数是纯函数，写文件只是薄薄一层 std::fs。

use std::fs;

use crate::error::{AppError, AppResult};
use crate::models::record::ResultSet;

/// 渲染按 topic 分组的纯文本导出
///
/// topic 升序、组内 question 升序由 ResultSet 自身保证。
pub fn render_text(set: &ResultSet) -> String {
    let mut out = String::new();
    for (topic, records) in set {
        out.push_str(&format!("Topic {}:\n", topic));
        for record in records {
            out.push_str(&format!("\nQuestion {} - {}\n", record.key.question, record.link));
            out.push_str(&record.question_text);
            out.push('\n');
            for choice in &record.choices {
                out.push_str("  ");
                out.push_str(choice);
                out.push('\n');
            }
            out.push_str(&format!("Suggested Answer: {}\n", record.suggested_answer));
        }
        out.push('\n');
    }
    out
}

/// 渲染两列 front/back 的 TSV
///
/// front = 题干 + 选项列表，back = 推荐答案；单元格内容做 HTML 转义，
/// 换行转成 <br>，制表符被剔除以免破坏列结构。
pub fn render_anki(set: &ResultSet) -> String {
    let mut out = String::new();
    for records in set.values() {
        for record in records {
            let mut front = html_cell(&record.question_text);
            if !record.choices.is_empty() {
                front.push_str("<br><br>");
                let choices: Vec<String> =
                    record.choices.iter().map(|c| html_cell(c)).collect();
                front.push_str(&choices.join("<br>"));
            }
            let back = html_cell(&record.suggested_answer);
            out.push_str(&format!("{}\t{}\n", front, back));
        }
    }
    out
}

pub fn write_text_export(path: &str, set: &ResultSet) -> AppResult<()> {
    fs::write(path, render_text(set)).map_err(|e| AppError::export_write_failed(path, e))
}

pub fn write_anki_export(path: &str, set: &ResultSet) -> AppResult<()> {
    fs::write(path, render_anki(set)).map_err(|e| AppError::export_write_failed(path, e))
}

/// 转成单元格安全的 HTML 片段
fn html_cell(raw: &str) -> String {
    html_escape(raw).replace('\n', "<br>").replace('\t', " ")
}

fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
