// ==========================================
// 课表解析 Worker - 配置错误类型
// ==========================================

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("缺少必填配置: {0}")]
    Missing(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error(".env 文件读取失败: {0}")]
    EnvFile(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
