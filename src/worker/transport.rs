// ==========================================
// 课表解析 Worker - 传输层接口
// ==========================================
// 职责: 定义消息投递与结果发布接口（不包含实现）
// 实现者: memory::MemoryBroker（进程内）, amqp::AmqpTransport（RabbitMQ）
// ==========================================

use crate::worker::error::WorkerResult;
use async_trait::async_trait;

// ==========================================
// JobDelivery Trait
// ==========================================
// 用途: 工作队列中的一条消息（xlsx 原始字节）
#[async_trait]
pub trait JobDelivery: Send + Sync {
    /// 消息体
    fn body(&self) -> &[u8];

    /// 投递标签（仅用于日志）
    fn delivery_tag(&self) -> u64;

    /// 确认消息
    ///
    /// # 说明
    /// - 仅在结果发布成功后调用
    /// - 未确认的消息由消息队列按其策略重投
    async fn ack(&self) -> WorkerResult<()>;
}

// ==========================================
// ResultPublisher Trait
// ==========================================
// 用途: 向结果队列发布 JSON 信封
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// 发布结果
    ///
    /// # 返回
    /// - Ok(()): 消息队列已接收（AMQP 下为 publisher confirm）
    /// - Err(Publish): 发布失败
    async fn publish(&self, payload: Vec<u8>) -> WorkerResult<()>;
}
