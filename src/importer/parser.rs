// ==========================================
// 课表解析 Worker - 解析编排器
// ==========================================
// 流程: 新建索引表 → 定位表头 → 抽取记录
// 规则: 全有或全无；不做 I/O，不共享可变状态
// ==========================================

use crate::domain::{CellValue, ClassToRegister};
use crate::importer::column_mapper::{ColumnIndexBuilder, ResolvedColumns};
use crate::importer::error::ParseResult;
use crate::importer::header_locator::locate_header;
use crate::importer::record_extractor::{extract_records, Extraction};
use crate::importer::vocabulary;

/// 解析报告
#[derive(Debug, Clone)]
pub struct ParseReport {
    /// 表头所在行（1 起始）
    pub header_row: usize,
    pub columns: ResolvedColumns,
    pub extraction: Extraction,
}

/// 课表解析器（每次调用独立持有索引表）
#[derive(Debug, Clone)]
pub struct ClassSheetParser {
    id: String,
    /// 行流第一行在工作表中的行号（1 起始）
    first_row: usize,
}

impl Default for ClassSheetParser {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

impl ClassSheetParser {
    /// # 参数
    /// - id: 日志标识（通常为任务 ID）
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_row: 1,
        }
    }

    /// 行流不从工作表第 1 行开始时（如解码器裁掉了前导空行），指定起始行号
    pub fn starting_at_row(mut self, first_row: usize) -> Self {
        self.first_row = first_row.max(1);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 解析行流，返回按行序排列的记录
    pub fn parse<I, R>(&self, rows: I) -> ParseResult<Vec<ClassToRegister>>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        self.parse_with_report(rows)
            .map(|report| report.extraction.classes)
    }

    /// 解析行流，返回包含表头位置与学期集合的完整报告
    pub fn parse_with_report<I, R>(&self, rows: I) -> ParseResult<ParseReport>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[CellValue]>,
    {
        let mut rows = rows.into_iter();

        let location = locate_header(&mut rows, ColumnIndexBuilder::new(), self.first_row)?;
        if !location.columns.is_complete() {
            let missing: Vec<&str> = location
                .columns
                .missing()
                .into_iter()
                .map(vocabulary::header_text)
                .collect();
            tracing::warn!(
                parser_id = %self.id,
                header_row = location.header_row,
                ?missing,
                "表头缺少部分列"
            );
        }

        let extraction = extract_records(rows, &location.columns, location.header_row + 1)?;

        tracing::info!(
            parser_id = %self.id,
            class_to_register_count = extraction.classes.len(),
            term_ids = ?extraction.term_ids,
            "课表解析完成"
        );
        if let Some(sample) = extraction.classes.first() {
            tracing::debug!(parser_id = %self.id, ?sample, "样例记录");
        }

        Ok(ParseReport {
            header_row: location.header_row,
            columns: location.columns,
            extraction,
        })
    }
}
