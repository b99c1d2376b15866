// ==========================================
// 课表解析 Worker - RabbitMQ 传输实现
// ==========================================
// 依赖: lapin（feature = "amqp"）
// 队列: 工作队列/结果队列均为 durable
// 确认: 手动 ack；结果发布开启 publisher confirm
// ==========================================

use crate::config::WorkerConfig;
use crate::worker::error::{WorkerError, WorkerResult};
use crate::worker::transport::{JobDelivery, ResultPublisher};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicQosOptions,
    ConfirmSelectOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};

// 持久化投递模式
const PERSISTENT_DELIVERY_MODE: u8 = 2;

fn connection_error(err: lapin::Error) -> WorkerError {
    WorkerError::Connection(err.to_string())
}

/// RabbitMQ 连接 + 通道
pub struct AmqpTransport {
    connection: Connection,
    channel: Channel,
    config: WorkerConfig,
}

impl AmqpTransport {
    /// 建立连接，声明队列并设置在途窗口
    pub async fn connect(config: &WorkerConfig) -> WorkerResult<Self> {
        let url = config.require_amqp_url()?;

        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(connection_error)?;
        let channel = connection.create_channel().await.map_err(connection_error)?;

        for queue in [&config.parse_queue, &config.result_queue] {
            channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions {
                        durable: true,
                        ..QueueDeclareOptions::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(connection_error)?;
        }

        channel
            .basic_qos(config.prefetch_count, BasicQosOptions::default())
            .await
            .map_err(connection_error)?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(connection_error)?;

        tracing::info!(
            parse_queue = %config.parse_queue,
            result_queue = %config.result_queue,
            prefetch_count = config.prefetch_count,
            "已连接消息队列"
        );

        Ok(Self {
            connection,
            channel,
            config: config.clone(),
        })
    }

    /// 开始消费工作队列（手动确认）
    pub async fn consume(&self) -> WorkerResult<impl Stream<Item = WorkerResult<AmqpDelivery>>> {
        let consumer = self
            .channel
            .basic_consume(
                &self.config.parse_queue,
                &self.config.consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(connection_error)?;

        Ok(consumer.map(|item| item.map(AmqpDelivery).map_err(connection_error)))
    }

    /// 结果队列发布端
    pub fn publisher(&self) -> AmqpPublisher {
        AmqpPublisher {
            channel: self.channel.clone(),
            routing_key: self.config.result_queue.clone(),
        }
    }

    /// 关闭通道与连接
    pub async fn close(&self) {
        if let Err(e) = self.channel.close(200, "worker shutdown").await {
            tracing::warn!(error = %e, "关闭通道失败");
        }
        if let Err(e) = self.connection.close(200, "worker shutdown").await {
            tracing::warn!(error = %e, "关闭连接失败");
        }
    }
}

/// RabbitMQ 投递
pub struct AmqpDelivery(Delivery);

#[async_trait]
impl JobDelivery for AmqpDelivery {
    fn body(&self) -> &[u8] {
        &self.0.data
    }

    fn delivery_tag(&self) -> u64 {
        self.0.delivery_tag
    }

    async fn ack(&self) -> WorkerResult<()> {
        self.0
            .acker
            .ack(BasicAckOptions::default())
            .await
            .map_err(|e| WorkerError::Ack(e.to_string()))
    }
}

/// RabbitMQ 结果发布端（默认交换机，routing key = 结果队列名）
#[derive(Clone)]
pub struct AmqpPublisher {
    channel: Channel,
    routing_key: String,
}

#[async_trait]
impl ResultPublisher for AmqpPublisher {
    async fn publish(&self, payload: Vec<u8>) -> WorkerResult<()> {
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(PERSISTENT_DELIVERY_MODE);

        let confirmation = self
            .channel
            .basic_publish(
                "",
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await
            .map_err(|e| WorkerError::Publish(e.to_string()))?
            .await
            .map_err(|e| WorkerError::Publish(e.to_string()))?;

        if confirmation.is_nack() {
            return Err(WorkerError::Publish(format!(
                "消息队列拒收 (routing_key: {})",
                self.routing_key
            )));
        }
        Ok(())
    }
}
