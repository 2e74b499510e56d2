use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 链接发现错误（列表页结构不可读）
    Discovery(DiscoveryError),
    /// 导出文件错误
    Export(ExportError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Discovery(e) => write!(f, "发现错误: {}", e),
            AppError::Export(e) => write!(f, "导出错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Discovery(e) => Some(e),
            AppError::Export(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 浏览器配置失败
    ConfigurationFailed {
        message: String,
    },
    /// 启动无头浏览器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 读取渲染后页面内容失败
    ContentReadFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConfigurationFailed { message } => {
                write!(f, "浏览器配置失败: {}", message)
            }
            BrowserError::LaunchFailed { source } => {
                write!(f, "启动无头浏览器失败: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::ContentReadFailed { source } => {
                write!(f, "读取页面内容失败: {}", source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConfigurationFailed { .. } => None,
            BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ContentReadFailed { source }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 链接发现错误
///
/// 列表页结构不可读时产生；对枚举阶段是致命的，
/// 调用方收到空链接集合并向用户提示"未找到页面"。
#[derive(Debug)]
pub enum DiscoveryError {
    /// 页数指示器缺失（站点结构变化或请求被拦截）
    PageIndicatorMissing {
        provider: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::PageIndicatorMissing { provider } => {
                write!(
                    f,
                    "未找到页数指示器 (厂商: {})，站点结构可能已变化或请求被拦截",
                    provider
                )
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// 导出文件错误
#[derive(Debug)]
pub enum ExportError {
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON序列化失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器启动错误
    pub fn browser_launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    /// 创建页面创建错误
    pub fn page_creation_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(source),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建页面内容读取错误
    pub fn content_read_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ContentReadFailed {
            source: Box::new(source),
        })
    }

    /// 创建页数指示器缺失错误
    pub fn page_indicator_missing(provider: impl Into<String>) -> Self {
        AppError::Discovery(DiscoveryError::PageIndicatorMissing {
            provider: provider.into(),
        })
    }

    /// 创建导出写入错误
    pub fn export_write_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Export(ExportError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
