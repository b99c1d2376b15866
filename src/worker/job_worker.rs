// ==========================================
// 课表解析 Worker - 任务处理循环
// ==========================================
// 状态机: RECEIVED → PARSED → PUBLISHED → ACKNOWLEDGED
//         任一阶段失败 → FAILED（消息不确认，留待重投）
// 说明: 解析为同步计算，放在 spawn_blocking 中执行
// ==========================================

use crate::domain::ResultEnvelope;
use crate::importer::{decode_first_sheet, ClassSheetParser};
use crate::worker::error::{WorkerError, WorkerResult};
use crate::worker::transport::{JobDelivery, ResultPublisher};
use futures::{Stream, TryStreamExt};
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// 单条消息的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Parsed,
    Published,
    Acknowledged,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Received => "RECEIVED",
            JobState::Parsed => "PARSED",
            JobState::Published => "PUBLISHED",
            JobState::Acknowledged => "ACKNOWLEDGED",
            JobState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// 已解析的任务（待发布）
#[derive(Debug, Clone)]
pub struct ParsedJob {
    /// JSON 信封字节
    pub payload: Vec<u8>,
    /// 表头在工作表中的行号（1 起始）
    pub header_row: usize,
    pub record_count: usize,
    pub term_ids: BTreeSet<String>,
}

/// 单条消息的处理结果
#[derive(Debug)]
pub struct JobOutcome {
    pub job_id: Uuid,
    /// 终态: Acknowledged 或 Failed
    pub state: JobState,
    /// 失败时所处阶段
    pub failed_at: Option<JobState>,
    pub record_count: usize,
    pub error: Option<WorkerError>,
}

impl JobOutcome {
    pub fn is_acknowledged(&self) -> bool {
        self.state == JobState::Acknowledged
    }
}

/// 消费循环汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub acknowledged: usize,
    pub failed: usize,
}

/// 解码 + 解析 + 序列化（同步，无 I/O）
pub fn parse_payload(job_id: &str, body: &[u8]) -> WorkerResult<ParsedJob> {
    let sheet = decode_first_sheet(body)?;
    tracing::info!(
        sheet = sheet.name(),
        max_row = sheet.height(),
        max_column = sheet.width(),
        first_row = sheet.first_row(),
        "收到课表工作表"
    );

    let report = ClassSheetParser::new(job_id)
        .starting_at_row(sheet.first_row())
        .parse_with_report(sheet.rows())?;
    let record_count = report.extraction.classes.len();
    let term_ids = report.extraction.term_ids;
    let payload = ResultEnvelope::new(report.extraction.classes).to_json_bytes()?;

    Ok(ParsedJob {
        payload,
        header_row: report.header_row,
        record_count,
        term_ids,
    })
}

/// 任务处理器
pub struct JobWorker<P> {
    publisher: P,
    job_timeout: Option<Duration>,
}

impl<P: ResultPublisher> JobWorker<P> {
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            job_timeout: None,
        }
    }

    /// 设置单任务超时（仅作用于解析阶段）
    pub fn with_timeout(mut self, job_timeout: Option<Duration>) -> Self {
        self.job_timeout = job_timeout;
        self
    }

    /// 处理一条消息
    pub async fn process<D: JobDelivery>(&self, delivery: &D) -> JobOutcome {
        let job_id = Uuid::new_v4();
        let span = tracing::info_span!("job", %job_id, delivery_tag = delivery.delivery_tag());

        async move {
            tracing::info!(bytes = delivery.body().len(), "收到新任务");

            let mut state = JobState::Received;
            match self.advance(job_id, delivery, &mut state).await {
                Ok(record_count) => {
                    tracing::info!(record_count, state = %JobState::Acknowledged, "任务完成");
                    JobOutcome {
                        job_id,
                        state: JobState::Acknowledged,
                        failed_at: None,
                        record_count,
                        error: None,
                    }
                }
                Err(error) => {
                    tracing::error!(failed_at = %state, error = %error, "任务失败，消息未确认");
                    JobOutcome {
                        job_id,
                        state: JobState::Failed,
                        failed_at: Some(state),
                        record_count: 0,
                        error: Some(error),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn advance<D: JobDelivery>(
        &self,
        job_id: Uuid,
        delivery: &D,
        state: &mut JobState,
    ) -> WorkerResult<usize> {
        let parsed = self.parse_in_background(job_id, delivery.body().to_vec()).await?;
        *state = JobState::Parsed;
        tracing::info!(
            record_count = parsed.record_count,
            term_ids = ?parsed.term_ids,
            "解析完成"
        );

        self.publisher.publish(parsed.payload).await?;
        *state = JobState::Published;

        delivery.ack().await?;
        *state = JobState::Acknowledged;

        Ok(parsed.record_count)
    }

    async fn parse_in_background(&self, job_id: Uuid, body: Vec<u8>) -> WorkerResult<ParsedJob> {
        let span = tracing::Span::current();
        let task = tokio::task::spawn_blocking(move || {
            let _guard = span.enter();
            parse_payload(&job_id.to_string(), &body)
        });

        // 超时后后台解析仍会跑完，但结果被丢弃
        let joined = match self.job_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| WorkerError::Timeout(limit))?,
            None => task.await,
        };

        joined.map_err(|e| WorkerError::TaskAborted(e.to_string()))?
    }

    /// 消费循环
    ///
    /// # 参数
    /// - deliveries: 消息流；流内错误（如连接断开）会终止循环
    /// - concurrency: 同时处理的消息上限（通常等于在途窗口）
    /// - shutdown: 完成时停止消费
    ///
    /// # 返回
    /// - Ok(RunSummary): 流结束或收到停止信号
    /// - Err: 消息流报错
    pub async fn run<S, D, F>(
        &self,
        deliveries: S,
        concurrency: usize,
        shutdown: F,
    ) -> WorkerResult<RunSummary>
    where
        S: Stream<Item = WorkerResult<D>>,
        D: JobDelivery,
        F: Future<Output = ()>,
    {
        let acknowledged = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let consume = {
            let acknowledged = &acknowledged;
            let failed = &failed;
            deliveries.try_for_each_concurrent(concurrency.max(1), move |delivery| async move {
                if self.process(&delivery).await.is_acknowledged() {
                    acknowledged.fetch_add(1, Ordering::Relaxed);
                } else {
                    failed.fetch_add(1, Ordering::Relaxed);
                }
                Ok::<(), WorkerError>(())
            })
        };

        tokio::select! {
            result = consume => result?,
            _ = shutdown => tracing::info!("收到停止信号，停止消费"),
        }

        Ok(RunSummary {
            acknowledged: acknowledged.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
        })
    }
}
