use std::fmt;

#[derive(Debug, Clone)]
pub enum HitError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    Serialization(String),
    DateParse(String),
}

impl HitError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            HitError::Config(_) => "E001",
            HitError::DatabaseConfig(_) => "E003",
            HitError::DatabaseConnection(_) => "E004",
            HitError::DatabaseOperation(_) => "E005",
            HitError::FileOperation(_) => "E006",
            HitError::Validation(_) => "E007",
            HitError::Serialization(_) => "E009",
            HitError::DateParse(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            HitError::Config(_) => "Configuration Error",
            HitError::DatabaseConfig(_) => "Database Configuration Error",
            HitError::DatabaseConnection(_) => "Database Connection Error",
            HitError::DatabaseOperation(_) => "Database Operation Error",
            HitError::FileOperation(_) => "File Operation Error",
            HitError::Validation(_) => "Validation Error",
            HitError::Serialization(_) => "Serialization Error",
            HitError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            HitError::Config(msg) => msg,
            HitError::DatabaseConfig(msg) => msg,
            HitError::DatabaseConnection(msg) => msg,
            HitError::DatabaseOperation(msg) => msg,
            HitError::FileOperation(msg) => msg,
            HitError::Validation(msg) => msg,
            HitError::Serialization(msg) => msg,
            HitError::DateParse(msg) => msg,
        }
    }

    /// 是否为数据库连接/操作错误
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            HitError::DatabaseConnection(_) | HitError::DatabaseOperation(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HitError {}

// 便捷的构造函数
impl HitError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        HitError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        HitError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        HitError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        HitError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        HitError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        HitError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        HitError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        HitError::DateParse(msg.into())
    }
}

impl From<sea_orm::DbErr> for HitError {
    fn from(err: sea_orm::DbErr) -> Self {
        HitError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for HitError {
    fn from(err: std::io::Error) -> Self {
        HitError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HitError {
    fn from(err: serde_json::Error) -> Self {
        HitError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for HitError {
    fn from(err: chrono::ParseError) -> Self {
        HitError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HitError>;
