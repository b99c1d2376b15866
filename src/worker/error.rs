// ==========================================
// 课表解析 Worker - Worker 层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 任一错误都使本条消息不被确认（留待重投）
// ==========================================

use crate::config::ConfigError;
use crate::importer::{DecodeError, ParseError};
use std::time::Duration;
use thiserror::Error;

/// Worker 错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    // ===== 解析相关错误 =====
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("结果序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("任务超时: 超过 {0:?}")]
    Timeout(Duration),

    #[error("解析任务异常终止: {0}")]
    TaskAborted(String),

    // ===== 传输相关错误 =====
    #[error("消息队列连接失败: {0}")]
    Connection(String),

    #[error("结果发布失败: {0}")]
    Publish(String),

    #[error("消息确认失败: {0}")]
    Ack(String),

    // ===== 配置错误 =====
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WorkerError {
    /// 是否为传输层错误（连接/发布/确认）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WorkerError::Connection(_) | WorkerError::Publish(_) | WorkerError::Ack(_)
        )
    }
}

/// Result 类型别名
pub type WorkerResult<T> = Result<T, WorkerError>;
