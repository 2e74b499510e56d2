/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时抓取的讨论页数量（每个在途链接独占一个无头浏览器实例）
    pub max_concurrent_fetches: usize,
    /// 讨论区根地址（不含厂商名）
    pub base_url: String,
    /// 页面渲染等待时长（毫秒），给 JS 渲染和反爬检查留出时间
    pub settle_ms: u64,
    /// 可选：轮询等待的 CSS 选择器；设置后用"轮询直到元素出现"代替固定等待
    pub settle_selector: Option<String>,
    /// 轮询间隔（毫秒）
    pub settle_poll_interval_ms: u64,
    /// 浏览器 User-Agent，伪装成普通用户
    pub user_agent: String,
    /// 可选：浏览器可执行文件路径；不设置则自动探测
    pub chrome_executable: Option<String>,
    /// 是否抑制浏览器自身的诊断输出
    pub browser_silent: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
            base_url: "https://www.examtopics.com/discussions".to_string(),
            settle_ms: 5000,
            settle_selector: None,
            settle_poll_interval_ms: 250,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            chrome_executable: None,
            browser_silent: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_fetches: std::env::var("MAX_CONCURRENT_FETCHES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_fetches),
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            settle_ms: std::env::var("SETTLE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_ms),
            settle_selector: std::env::var("SETTLE_SELECTOR").ok().filter(|v| !v.is_empty()),
            settle_poll_interval_ms: std::env::var("SETTLE_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_poll_interval_ms),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()),
            browser_silent: std::env::var("BROWSER_SILENT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_silent),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
