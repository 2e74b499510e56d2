//! 并行抓取协调器 - 编排层
//!
//! ## 职责
//!
//! 把排好序的链接派发给抓取流程，并发数量有上界：
//! 每条在途链接独占一个完整的浏览器实例，无上界的扇出会耗尽宿主资源。
//!
//! ## 核心功能
//!
//! 1. **并发控制**：Semaphore 限制在途数量，剩余链接排队等空位
//! 2. **失败隔离**：流程本身永不失败；任务 panic 也会被降级为哨兵记录
//! 3. **结果收集**：逐个 await 任务句柄，每条输入恰好产出一条记录
//! 4. **进度输出**：完成数/总数（仅供观察，不参与控制）
//!
//! 输出顺序不做保证：完成顺序是墙钟顺序，确定性排序由聚合阶段恢复。

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::config::Config;
use crate::models::link::LinkItem;
use crate::models::record::QuestionRecord;
use crate::workflow::FetchFlow;

/// 并行抓取全部链接
///
/// 每条链接走一遍完整的 FetchFlow（独立会话），返回全部记录后才结束；
/// 没有部分返回路径。
pub async fn fetch_all(items: Vec<LinkItem>, config: &Config) -> Result<Vec<QuestionRecord>> {
    log_fetch_start(items.len(), config.max_concurrent_fetches);

    let flow = FetchFlow::new(config);
    fetch_all_with(items, config.max_concurrent_fetches, move |item| {
        let flow = flow.clone();
        async move { flow.run(&item).await }
    })
    .await
}

/// 并发协调核心：对每条链接执行 `fetch_one`，在途数量不超过 `concurrency`
///
/// 与具体抓取实现解耦，便于用模拟流程验证并发上界和失败隔离。
/// 任务 panic 时用原始键和链接降级补位，同批其他任务不受影响。
pub async fn fetch_all_with<F, Fut>(
    items: Vec<LinkItem>,
    concurrency: usize,
    fetch_one: F,
) -> Result<Vec<QuestionRecord>>
where
    F: Fn(LinkItem) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = QuestionRecord> + Send + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));
    let fetch_one = Arc::new(fetch_one);

    let mut handles = Vec::with_capacity(total);

    for item in items {
        // 先拿许可再派发，在途数量不会超过并发上界
        let permit = semaphore.clone().acquire_owned().await?;
        let fetch_one = fetch_one.clone();
        let completed = completed.clone();
        let fallback = (item.key, item.link.clone());

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let record = fetch_one(item).await;
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            info!("📥 抓取进度: {}/{}", done, total);
            record
        });
        handles.push((fallback, handle));
    }

    // 等待全部任务完成；单条失败不取消、不阻塞其余任务
    let mut records = Vec::with_capacity(total);
    for ((key, link), handle) in handles {
        match handle.await {
            Ok(record) => records.push(record),
            Err(e) => {
                error!("[{}-{}] 任务执行失败: {}", key.topic, key.question, e);
                records.push(QuestionRecord::degraded(key, link));
            }
        }
    }

    Ok(records)
}

fn log_fetch_start(total: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始并行抓取 {} 条讨论链接", total);
    info!("📊 最大并发数: {} (每条在途链接一个浏览器实例)", max_concurrent);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::link::QuestionKey;
    use std::time::Duration;
    use tokio::time::sleep;

    fn item(topic: u32, question: u32) -> LinkItem {
        LinkItem {
            key: QuestionKey { topic, question },
            link: format!("https://e.com/topic-{}-question-{}", topic, question),
        }
    }

    fn healthy(item: &LinkItem) -> QuestionRecord {
        QuestionRecord {
            key: item.key,
            link: item.link.clone(),
            question_text: "ok".to_string(),
            choices: vec![],
            suggested_answer: "A".to_string(),
        }
    }

    /// 并发上界：2 个许可、5 条链接、每条耗时 100ms，
    /// 总时长至少 ceil(5/2)*100ms，且在途数量从不超过 2
    #[tokio::test(start_paused = true)]
    async fn test_bounded_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<LinkItem> = (1..=5).map(|q| item(1, q)).collect();

        let in_flight_c = in_flight.clone();
        let max_seen_c = max_seen.clone();
        let start = tokio::time::Instant::now();

        let records = fetch_all_with(items, 2, move |item| {
            let in_flight = in_flight_c.clone();
            let max_seen = max_seen_c.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(100)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                healthy(&item)
            }
        })
        .await
        .unwrap();

        assert_eq!(records.len(), 5);
        assert!(max_seen.load(Ordering::SeqCst) <= 2, "在途数量超过并发上界");
        assert!(
            start.elapsed() >= Duration::from_millis(300),
            "5 条链接 2 并发不可能快于 3 轮"
        );
    }

    /// 失败隔离：1 条任务 panic，其余 4 条不受影响，总记录数仍是 5
    #[tokio::test]
    async fn test_single_failure_does_not_corrupt_batch() {
        let items: Vec<LinkItem> = (1..=5).map(|q| item(1, q)).collect();

        let records = fetch_all_with(items, 3, move |item| async move {
            if item.key.question == 3 {
                panic!("simulated fetch crash");
            }
            healthy(&item)
        })
        .await
        .unwrap();

        assert_eq!(records.len(), 5);

        let degraded: Vec<_> = records.iter().filter(|r| r.is_degraded()).collect();
        assert_eq!(degraded.len(), 1);
        assert_eq!(degraded[0].key, QuestionKey { topic: 1, question: 3 });
        // 降级记录保留原始链接
        assert_eq!(degraded[0].link, "https://e.com/topic-1-question-3");

        let healthy_count = records.iter().filter(|r| !r.is_degraded()).count();
        assert_eq!(healthy_count, 4);
    }

    /// 每条输入恰好一条输出，空输入产出空结果
    #[tokio::test]
    async fn test_one_record_per_item() {
        let records = fetch_all_with(vec![], 2, |item: LinkItem| async move { healthy(&item) })
            .await
            .unwrap();
        assert!(records.is_empty());

        let items = vec![item(1, 1), item(2, 1)];
        let records = fetch_all_with(items, 2, |item: LinkItem| async move { healthy(&item) })
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }
}
