//! Client configuration

/// 客户端配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | STOREFRONT_LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | STOREFRONT_LOG_JSON | false | JSON 格式日志 |
/// | STOREFRONT_LOG_DIR | - | 日志文件目录 (按天滚动) |
/// | STOREFRONT_TOAST_CAPACITY | 64 | 通知广播缓冲 |
/// | STOREFRONT_DEV_TOOLS | true | 购物车 store 调试记录 |
/// | STOREFRONT_DEV_TOOLS_MAX_AGE | 50 | 调试记录条数上限 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// JSON console output
    pub log_json: bool,
    /// Directory for daily rotating log files
    pub log_dir: Option<String>,
    /// Capacity of the toast broadcast channel
    pub toast_capacity: usize,
    /// Record dispatched cart actions for inspection
    pub dev_tools: bool,
    /// Number of inspection entries kept
    pub dev_tools_max_age: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
            toast_capacity: 64,
            dev_tools: true,
            dev_tools_max_age: 50,
        }
    }
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("STOREFRONT_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: std::env::var("STOREFRONT_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
            log_dir: std::env::var("STOREFRONT_LOG_DIR")
                .ok()
                .filter(|dir| !dir.is_empty()),
            toast_capacity: std::env::var("STOREFRONT_TOAST_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.toast_capacity),
            dev_tools: std::env::var("STOREFRONT_DEV_TOOLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dev_tools),
            dev_tools_max_age: std::env::var("STOREFRONT_DEV_TOOLS_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dev_tools_max_age),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_toast_capacity(mut self, capacity: usize) -> Self {
        self.toast_capacity = capacity.max(1);
        self
    }

    /// 设置购物车调试记录 (默认开启)
    pub fn with_dev_tools(mut self, enabled: bool) -> Self {
        self.dev_tools = enabled;
        self
    }

    /// Store options derived from this configuration
    pub fn store_options(&self) -> crate::store::StoreOptions {
        crate::store::StoreOptions {
            dev_tools: self.dev_tools,
            dev_tools_max_age: self.dev_tools_max_age,
        }
    }

    /// Initialize logging from this configuration
    pub fn init_logger(&self) -> anyhow::Result<()> {
        crate::logger::init_logger(&self.log_level, self.log_json, self.log_dir.as_deref())
    }
}
