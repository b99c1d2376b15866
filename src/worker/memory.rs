// ==========================================
// 课表解析 Worker - 进程内消息队列
// ==========================================
// 职责: 用 tokio mpsc 模拟工作队列/结果队列（测试与本地运行）
// 在途窗口: Semaphore，每条投递持有一个许可直到被释放
// 未确认的投递在释放时进入待重投列表
// ==========================================

use crate::worker::error::{WorkerError, WorkerResult};
use crate::worker::transport::{JobDelivery, ResultPublisher};
use async_trait::async_trait;
use futures::Stream;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

#[derive(Default)]
struct BrokerShared {
    results: Mutex<Vec<Vec<u8>>>,
    unacked: Mutex<Vec<Vec<u8>>>,
    acked: AtomicUsize,
    fail_publish: AtomicBool,
    next_tag: AtomicU64,
}

/// 进程内消息队列
pub struct MemoryBroker {
    shared: Arc<BrokerShared>,
    window: Arc<Semaphore>,
    sender: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
}

impl MemoryBroker {
    /// # 参数
    /// - prefetch: 在途窗口（未确认投递上限）
    pub fn new(prefetch: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(BrokerShared::default()),
            window: Arc::new(Semaphore::new(prefetch.max(1))),
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
        }
    }

    /// 向工作队列投递一条任务
    pub fn enqueue(&self, body: Vec<u8>) -> WorkerResult<()> {
        let guard = self
            .sender
            .lock()
            .map_err(|e| WorkerError::Connection(format!("锁获取失败: {}", e)))?;
        let sender = guard
            .as_ref()
            .ok_or_else(|| WorkerError::Connection("工作队列已关闭".to_string()))?;
        sender
            .send(body)
            .map_err(|_| WorkerError::Connection("消费者已断开".to_string()))
    }

    /// 将未确认的消息重新放回工作队列
    pub fn requeue_unacked(&self) -> WorkerResult<usize> {
        let pending = match self.shared.unacked.lock() {
            Ok(mut unacked) => std::mem::take(&mut *unacked),
            Err(e) => return Err(WorkerError::Connection(format!("锁获取失败: {}", e))),
        };
        let count = pending.len();
        for body in pending {
            self.enqueue(body)?;
        }
        Ok(count)
    }

    /// 关闭工作队列（已入队的消息仍会被消费，之后消息流结束）
    pub fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }

    /// 消费工作队列（只能调用一次）
    pub fn consume(&self) -> WorkerResult<impl Stream<Item = WorkerResult<MemoryDelivery>>> {
        let receiver = self
            .receiver
            .lock()
            .map_err(|e| WorkerError::Connection(format!("锁获取失败: {}", e)))?
            .take()
            .ok_or_else(|| WorkerError::Connection("工作队列已有消费者".to_string()))?;

        let state = (receiver, self.window.clone(), self.shared.clone());
        Ok(futures::stream::unfold(
            state,
            |(mut receiver, window, shared)| async move {
                let body = receiver.recv().await?;
                let permit = window.clone().acquire_owned().await.ok()?;
                let delivery = MemoryDelivery {
                    body,
                    tag: shared.next_tag.fetch_add(1, Ordering::Relaxed) + 1,
                    acked: AtomicBool::new(false),
                    shared: shared.clone(),
                    _permit: permit,
                };
                Some((Ok::<_, WorkerError>(delivery), (receiver, window, shared)))
            },
        ))
    }

    /// 结果队列发布端
    pub fn publisher(&self) -> MemoryPublisher {
        MemoryPublisher {
            shared: self.shared.clone(),
        }
    }

    /// 让后续发布失败（模拟结果队列不可用）
    pub fn set_publish_failure(&self, fail: bool) {
        self.shared.fail_publish.store(fail, Ordering::Relaxed);
    }

    /// 已发布到结果队列的消息
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.shared
            .results
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn acked_count(&self) -> usize {
        self.shared.acked.load(Ordering::Relaxed)
    }

    /// 待重投（未确认）的消息数
    pub fn unacked_count(&self) -> usize {
        self.shared.unacked.lock().map(|u| u.len()).unwrap_or_default()
    }

    /// 当前可用的在途窗口许可数
    pub fn available_window(&self) -> usize {
        self.window.available_permits()
    }
}

/// 进程内投递
pub struct MemoryDelivery {
    body: Vec<u8>,
    tag: u64,
    acked: AtomicBool,
    shared: Arc<BrokerShared>,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl JobDelivery for MemoryDelivery {
    fn body(&self) -> &[u8] {
        &self.body
    }

    fn delivery_tag(&self) -> u64 {
        self.tag
    }

    async fn ack(&self) -> WorkerResult<()> {
        if self.acked.swap(true, Ordering::AcqRel) {
            return Err(WorkerError::Ack(format!("重复确认: delivery_tag={}", self.tag)));
        }
        self.shared.acked.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Drop for MemoryDelivery {
    fn drop(&mut self) {
        if self.acked.load(Ordering::Acquire) {
            return;
        }
        if let Ok(mut unacked) = self.shared.unacked.lock() {
            unacked.push(std::mem::take(&mut self.body));
        }
    }
}

/// 进程内结果发布端
#[derive(Clone)]
pub struct MemoryPublisher {
    shared: Arc<BrokerShared>,
}

#[async_trait]
impl ResultPublisher for MemoryPublisher {
    async fn publish(&self, payload: Vec<u8>) -> WorkerResult<()> {
        if self.shared.fail_publish.load(Ordering::Relaxed) {
            return Err(WorkerError::Publish("结果队列不可用".to_string()));
        }
        self.shared
            .results
            .lock()
            .map_err(|e| WorkerError::Publish(format!("锁获取失败: {}", e)))?
            .push(payload);
        Ok(())
    }
}
