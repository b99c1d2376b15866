// ==========================================
// 课表解析 Worker - 主入口
// ==========================================
// 流程: 加载配置 → 初始化日志 → 连接 RabbitMQ → 消费工作队列
// 退出: CTRL+C
// ==========================================

#[cfg(feature = "amqp")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use tkb_parser::worker::{AmqpTransport, JobWorker};
    use tkb_parser::{logging, WorkerConfig};

    // .env 先于日志加载，LOG_FORMAT / RUST_LOG 可写在 .env 中
    let config = WorkerConfig::from_env().context("加载配置失败")?;
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("课表解析 Worker");
    tracing::info!("系统版本: {}", tkb_parser::VERSION);
    tracing::info!("==================================================");

    let transport = AmqpTransport::connect(&config)
        .await
        .context("连接消息队列失败")?;
    let worker = JobWorker::new(transport.publisher()).with_timeout(config.job_timeout);
    let deliveries = transport.consume().await.context("订阅工作队列失败")?;

    tracing::info!(queue = %config.parse_queue, "等待消息中，按 CTRL+C 退出");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "无法监听 CTRL+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Interrupted");
    };

    let result = worker
        .run(deliveries, usize::from(config.prefetch_count), shutdown)
        .await;
    transport.close().await;

    let summary = result.context("消费循环异常退出")?;
    tracing::info!(
        acknowledged = summary.acknowledged,
        failed = summary.failed,
        "Worker 已退出"
    );
    Ok(())
}

#[cfg(not(feature = "amqp"))]
fn main() {
    println!("==================================================");
    println!("课表解析 Worker");
    println!("系统版本: {}", tkb_parser::VERSION);
    println!("==================================================");
    println!();
    println!("此可执行文件需要启用 amqp 特性");
    println!("使用: cargo run --features amqp");
    println!();
    println!("或者使用库模式:");
    println!("use tkb_parser::ClassSheetParser;");
}
