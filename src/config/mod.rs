// ==========================================
// 课表解析 Worker - 配置层
// ==========================================
// 职责: 队列名称、在途窗口、超时等运行配置
// 存储: 环境变量 / .env
// ==========================================

pub mod error;
pub mod worker_config;

// 重导出核心配置
pub use error::{ConfigError, ConfigResult};
pub use worker_config::{config_keys, defaults, WorkerConfig};
