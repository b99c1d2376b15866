// ==========================================
// 课表解析 Worker - 解析层
// ==========================================
// 职责: 表头驱动的列映射 + 数据行 → ClassToRegister
// 流程: 行流 → 定位表头 → 冻结列索引 → 抽取记录
// ==========================================

// 模块声明
pub mod column_mapper;
pub mod error;
pub mod header_locator;
pub mod parser;
pub mod record_extractor;
pub mod vocabulary;
pub mod workbook_decoder;

// 重导出核心类型
pub use column_mapper::{ColumnIndexBuilder, ResolvedColumns};
pub use error::{DecodeError, DecodeResult, ParseError, ParseResult};
pub use header_locator::{locate_header, HeaderLocation};
pub use parser::{ClassSheetParser, ParseReport};
pub use record_extractor::{extract_records, Extraction};
pub use workbook_decoder::{decode_first_sheet, DecodedSheet};
