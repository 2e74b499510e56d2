//! # ExamTopics Scraper
//!
//! 一个用于批量抓取 examtopics 讨论页并导出学习材料的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Browser）
//! - `browser/` - 持有稀缺资源（浏览器实例），只暴露能力
//! - `RendererSession` - 一个会话 = 一个隔离的浏览器 + 页面，
//!   提供 navigate / settle / content / eval 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LinkEnumerator` - 走列表页、按搜索词过滤讨论链接的能力
//! - `RecordExtractor` - 从渲染结果提取单道题目的能力（永不失败）
//! - `exporter` - 写分组文本 / front-back 卡片文件的能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条链接"的完整处理流程
//! - `FetchFlow` - 开会话 → 导航 → 等渲染 → 提取 → 关会话，
//!   任何失败都降级为哨兵记录
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_fetcher` - 并行抓取协调器，管理并发上界
//! - `orchestrator/app` - 应用驱动，串联发现 → 抓取 → 聚合 → 导出
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{RendererSession, SettlePolicy};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{aggregate, keyed_items, resolve_key, LinkItem, QuestionKey, QuestionRecord, ResultSet};
pub use orchestrator::{fetch_all, fetch_all_with, App};
pub use services::{LinkEnumerator, RecordExtractor};
pub use workflow::FetchFlow;
