use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// 默认的爬虫 User-Agent 片段（大小写不敏感的子串匹配）
pub const DEFAULT_BOT_USER_AGENTS: &[&str] = &[
    "bingbot",
    "bot",
    "crawler",
    "facebookexternalhit",
    "googlebot",
    "linkedinbot",
    "scraper",
    "slackbot",
    "spider",
    "telegrambot",
    "twitterbot",
    "whatsapp",
];

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - hits: 访问记录的过滤与保留策略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub hits: HitsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：HC，分隔符：__
    /// 示例：HC__HITS__COOLDOWN_MINUTES=10
    pub fn load(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 HC，分隔符 __
            .add_source(
                Environment::with_prefix("HC")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("hits.bot_user_agents")
                    .with_list_parse_key("hits.trusted_proxies")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 访问记录配置
///
/// 启动时构建一次，之后只读。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HitsConfig {
    /// 只记录已登录用户的访问
    #[serde(default)]
    pub authenticated_only: bool,
    /// 忽略爬虫请求
    #[serde(default = "default_ignore_bots")]
    pub ignore_bots: bool,
    /// 爬虫 User-Agent 片段，按顺序匹配
    #[serde(default = "default_bot_user_agents")]
    pub bot_user_agents: Vec<String>,
    /// 同一 IP 对同一目标的冷却时间（分钟），0 表示关闭
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    /// 计算 today / this week / this month 时使用的 UTC 偏移，如 "+08:00"
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// 后台清理保留天数，0 表示不启动后台清理
    #[serde(default)]
    pub retention_days: u32,
    /// 清理时每批删除的行数
    #[serde(default = "default_cleanup_batch_size")]
    pub cleanup_batch_size: u64,
    /// 可信反向代理（IP 或 CIDR）
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

impl HitsConfig {
    /// Parse `timezone` into a fixed offset. Accepts `UTC`, `Z` or `±HH:MM`.
    pub fn utc_offset(&self) -> Result<FixedOffset, String> {
        let tz = self.timezone.trim();
        if tz.is_empty() || tz.eq_ignore_ascii_case("utc") || tz == "Z" {
            return Ok(Utc.fix());
        }
        tz.parse::<FixedOffset>()
            .map_err(|e| format!("Invalid timezone offset '{}': {}", self.timezone, e))
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_database_url() -> String {
    "hits.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_ignore_bots() -> bool {
    true
}

fn default_bot_user_agents() -> Vec<String> {
    DEFAULT_BOT_USER_AGENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cooldown_minutes() -> u32 {
    5
}

fn default_timezone() -> String {
    "+00:00".to_string()
}

fn default_cleanup_batch_size() -> u64 {
    10_000
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            authenticated_only: false,
            ignore_bots: default_ignore_bots(),
            bot_user_agents: default_bot_user_agents(),
            cooldown_minutes: default_cooldown_minutes(),
            timezone: default_timezone(),
            retention_days: 0,
            cleanup_batch_size: default_cleanup_batch_size(),
            trusted_proxies: Vec::new(),
        }
    }
}
