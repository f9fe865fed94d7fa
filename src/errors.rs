use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPulseError {
    Validation(String),
    Conflict(String),
    AliasTaken(String),
    KeyGenerationExhausted(String),
    NotFound(String),
    Gone(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    CacheConnection(String),
    CacheOperation(String),
    FileOperation(String),
}

impl LinkPulseError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkPulseError::Validation(_) => "E001",
            LinkPulseError::Conflict(_) => "E002",
            LinkPulseError::AliasTaken(_) => "E003",
            LinkPulseError::KeyGenerationExhausted(_) => "E004",
            LinkPulseError::NotFound(_) => "E005",
            LinkPulseError::Gone(_) => "E006",
            LinkPulseError::DatabaseConfig(_) => "E007",
            LinkPulseError::DatabaseConnection(_) => "E008",
            LinkPulseError::DatabaseOperation(_) => "E009",
            LinkPulseError::CacheConnection(_) => "E010",
            LinkPulseError::CacheOperation(_) => "E011",
            LinkPulseError::FileOperation(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkPulseError::Validation(_) => "Validation Error",
            LinkPulseError::Conflict(_) => "Conflict",
            LinkPulseError::AliasTaken(_) => "Alias Taken",
            LinkPulseError::KeyGenerationExhausted(_) => "Key Generation Exhausted",
            LinkPulseError::NotFound(_) => "Resource Not Found",
            LinkPulseError::Gone(_) => "Resource Gone",
            LinkPulseError::DatabaseConfig(_) => "Database Configuration Error",
            LinkPulseError::DatabaseConnection(_) => "Database Connection Error",
            LinkPulseError::DatabaseOperation(_) => "Database Operation Error",
            LinkPulseError::CacheConnection(_) => "Cache Connection Error",
            LinkPulseError::CacheOperation(_) => "Cache Operation Error",
            LinkPulseError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkPulseError::Validation(msg)
            | LinkPulseError::Conflict(msg)
            | LinkPulseError::AliasTaken(msg)
            | LinkPulseError::KeyGenerationExhausted(msg)
            | LinkPulseError::NotFound(msg)
            | LinkPulseError::Gone(msg)
            | LinkPulseError::DatabaseConfig(msg)
            | LinkPulseError::DatabaseConnection(msg)
            | LinkPulseError::DatabaseOperation(msg)
            | LinkPulseError::CacheConnection(msg)
            | LinkPulseError::CacheOperation(msg)
            | LinkPulseError::FileOperation(msg) => msg,
        }
    }

    /// Store or cache unreachable / failing. Surfaced to callers as a server
    /// error and never retried inside the core.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LinkPulseError::DatabaseConnection(_)
                | LinkPulseError::DatabaseOperation(_)
                | LinkPulseError::CacheConnection(_)
                | LinkPulseError::CacheOperation(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
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

impl fmt::Display for LinkPulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkPulseError {}

// 便捷的构造函数
impl LinkPulseError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::Validation(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::Conflict(msg.into())
    }

    pub fn alias_taken<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::AliasTaken(msg.into())
    }

    pub fn key_generation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::KeyGenerationExhausted(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::NotFound(msg.into())
    }

    pub fn gone<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::Gone(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::DatabaseOperation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::CacheConnection(msg.into())
    }

    pub fn cache_operation<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::CacheOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkPulseError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkPulseError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkPulseError::DatabaseOperation(err.to_string())
    }
}

impl From<redis::RedisError> for LinkPulseError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout() {
            LinkPulseError::CacheConnection(err.to_string())
        } else {
            LinkPulseError::CacheOperation(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkPulseError>;
