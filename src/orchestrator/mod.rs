//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整条流水线的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_fetcher` - 并行抓取协调器
//! - 把排好序的链接批量派发给抓取流程
//! - 控制并发数量（Semaphore，一条在途链接 = 一个浏览器实例）
//! - 通过任务句柄收集结果，单条失败不影响同批其他链接
//! - 输出抓取进度
//!
//! ### `app` - 应用驱动
//! - 交互式收集厂商名和搜索词
//! - 串联 发现 → 键解析排序 → 并行抓取 → 聚合 → 导出
//! - 处理用户中断（中断时不写出任何文件）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (整条流水线)
//!     ↓
//! batch_fetcher (处理 Vec<LinkItem>)
//!     ↓
//! workflow::FetchFlow (处理单个 LinkItem)
//!     ↓
//! services (能力层：enumerate / extract / export)
//!     ↓
//! browser (基础设施：RendererSession)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格分段**：所有发现完成之后才开始任何抓取派发
//! 2. **资源隔离**：会话只在流程层内部存在，编排层不持有浏览器
//! 3. **结果即值**：完成的任务各自返回记录，没有共享可变集合
//! 4. **无业务逻辑**：只做调度和统计，不做具体解析判断

pub mod app;
pub mod batch_fetcher;

pub use app::App;
pub use batch_fetcher::{fetch_all, fetch_all_with};
