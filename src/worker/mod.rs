// ==========================================
// 课表解析 Worker - 消息处理层
// ==========================================
// 职责: 收消息 → 解析 → 发布 JSON 信封 → 确认
// 传输: memory（进程内）/ amqp（RabbitMQ，可选特性）
// ==========================================

#[cfg(feature = "amqp")]
pub mod amqp;
pub mod error;
pub mod job_worker;
pub mod memory;
pub mod transport;

// 重导出核心类型
#[cfg(feature = "amqp")]
pub use amqp::{AmqpDelivery, AmqpPublisher, AmqpTransport};
pub use error::{WorkerError, WorkerResult};
pub use job_worker::{parse_payload, JobOutcome, JobState, JobWorker, ParsedJob, RunSummary};
pub use memory::{MemoryBroker, MemoryDelivery, MemoryPublisher};
pub use transport::{JobDelivery, ResultPublisher};
