// ==========================================
// 课表解析 Worker - 表头定位器
// ==========================================
// 职责: 自顶向下扫描行，找到第一个含可识别列名的行作为表头
// 说明: 表头之上允许任意标题/元数据行
// ==========================================

use crate::domain::CellValue;
use crate::importer::column_mapper::{ColumnIndexBuilder, ResolvedColumns};
use crate::importer::error::{ParseError, ParseResult};

/// 表头定位结果
#[derive(Debug, Clone)]
pub struct HeaderLocation {
    /// 表头所在行（1 起始）
    pub header_row: usize,
    /// 冻结后的属性列索引表
    pub columns: ResolvedColumns,
}

/// 定位表头
///
/// # 参数
/// - rows: 行迭代器；返回后停在表头行之后
/// - builder: 初始全部未解析的索引表
/// - first_row: 行流第一行对应的工作表行号（1 起始）
///
/// # 返回
/// - Ok(HeaderLocation): 只要某一行使至少一个属性被解析即停止
/// - Err(HeaderNotFound): 行耗尽仍无任何属性被解析
pub fn locate_header<I, R>(
    rows: &mut I,
    mut builder: ColumnIndexBuilder,
    first_row: usize,
) -> ParseResult<HeaderLocation>
where
    I: Iterator<Item = R>,
    R: AsRef<[CellValue]>,
{
    let mut scanned_rows = 0;

    for row in rows.by_ref() {
        scanned_rows += 1;
        builder.map_row(row.as_ref());

        if builder.is_any_resolved() {
            let columns = builder.freeze();
            let header_row = first_row + scanned_rows - 1;
            tracing::debug!(
                header_row,
                resolved = columns.resolved_count(),
                "找到表头行"
            );
            return Ok(HeaderLocation {
                header_row,
                columns,
            });
        }
    }

    Err(ParseError::HeaderNotFound { scanned_rows })
}
