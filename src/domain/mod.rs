// ==========================================
// 课表解析 Worker - 领域模型层
// ==========================================
// 职责: 定义单元格值、班级属性、抽取结果实体
// 红线: 不含解析逻辑,不含传输逻辑
// ==========================================

pub mod attribute;
pub mod cell;
pub mod class_to_register;

// 重导出核心类型
pub use attribute::{AttributeKind, ClassAttribute};
pub use cell::CellValue;
pub use class_to_register::{ClassToRegister, ResultEnvelope};
