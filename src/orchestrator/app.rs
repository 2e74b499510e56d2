//! 应用驱动 - 编排层
//!
//! 串联整条流水线：交互输入 → 链接发现 → 键解析排序 → 并行抓取 →
//! 聚合 → 导出。所有发现完成之后才开始任何抓取派发。
//!
//! 抓取阶段监听用户中断：中断时直接放弃内存中的部分结果，
//! 不写出任何文件。

use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::link::keyed_items;
use crate::models::record::aggregate;
use crate::orchestrator::batch_fetcher;
use crate::services::exporter;
use crate::services::LinkEnumerator;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        logging::log_startup(self.config.max_concurrent_fetches);

        // 交互式收集厂商名和搜索词
        let provider = prompt("请输入厂商名称 (如 amazon): ")?;
        if provider.is_empty() {
            warn!("⚠️ 厂商名称不能为空，程序结束");
            return Ok(());
        }

        let search_term = prompt("请输入考试代码 (输入 QUIT 退出): ")?;
        if search_term.is_empty() || search_term.eq_ignore_ascii_case("quit") {
            info!("已退出");
            return Ok(());
        }

        // ========== 阶段 1: 链接发现（串行，单会话） ==========
        let enumerator = LinkEnumerator::new(&self.config);
        let links = enumerator.enumerate(&provider, &search_term).await?;

        if links.is_empty() {
            warn!("⚠️ 该厂商下未找到任何页面，程序结束");
            return Ok(());
        }

        // 解析排序键，丢弃不匹配的链接，按 (topic, question) 升序
        let items = keyed_items(links);
        if items.is_empty() {
            warn!("⚠️ 没有链接能解析出 topic/question 键，程序结束");
            return Ok(());
        }
        logging::log_links_ready(items.len());

        // ========== 阶段 2: 并行抓取 ==========
        // 用户中断时放弃全部内存结果，不写出任何文件
        let records = tokio::select! {
            result = batch_fetcher::fetch_all(items, &self.config) => result?,
            _ = tokio::signal::ctrl_c() => {
                warn!("\n⚠️ 检测到中断信号，放弃本次抓取，不写出任何文件");
                return Ok(());
            }
        };

        // ========== 阶段 3: 聚合与导出 ==========
        let result_set = aggregate(records);

        let text_path = format!("{} dumps.txt", search_term);
        let anki_path = format!("{} anki.tsv", search_term);
        exporter::write_text_export(&text_path, &result_set)?;
        exporter::write_anki_export(&anki_path, &result_set)?;

        let total: usize = result_set.values().map(|group| group.len()).sum();
        let degraded = result_set
            .values()
            .flatten()
            .filter(|record| record.is_degraded())
            .count();
        logging::print_final_stats(total - degraded, degraded, total, &text_path, &anki_path);

        Ok(())
    }
}

/// 读取一行用户输入（去除首尾空白）
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
