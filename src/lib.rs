// ==========================================
// 课表解析 Worker - 核心库
// ==========================================
// 职责: 消费工作队列中的课表 xlsx，按表头映射抽取待注册班级，
//       以 JSON 信封发布到结果队列
// 技术栈: tokio + calamine + RabbitMQ (lapin)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格与记录
pub mod domain;

// 解析层 - 表头定位与记录抽取
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 消息处理层 - Worker 循环与传输
pub mod worker;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{CellValue, ClassAttribute, ClassToRegister, ResultEnvelope};
pub use importer::{ClassSheetParser, ParseError, ParseResult};
pub use config::WorkerConfig;
pub use worker::{JobWorker, WorkerError, WorkerResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "tkb-parser-worker";
