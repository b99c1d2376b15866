// ==========================================
// 课表解析 Worker - 记录抽取器
// ==========================================
// 职责: 表头之后的每一数据行 → 一条 ClassToRegister
// 规则: 保持行序；任一行失败则整次抽取失败（不跳过坏行）
// ==========================================

use crate::domain::{CellValue, ClassAttribute, ClassToRegister};
use crate::importer::column_mapper::ResolvedColumns;
use crate::importer::error::{ParseError, ParseResult};
use std::collections::BTreeSet;

/// 抽取结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// 按输入行序排列的记录
    pub classes: Vec<ClassToRegister>,
    /// 出现过的学期 ID（去重）
    pub term_ids: BTreeSet<String>,
}

/// 抽取全部数据行
///
/// # 参数
/// - rows: 表头之后的剩余行
/// - columns: 冻结的属性列索引表
/// - first_row: 第一条数据行的工作表行号（1 起始，仅用于错误定位）
pub fn extract_records<I, R>(
    rows: I,
    columns: &ResolvedColumns,
    first_row: usize,
) -> ParseResult<Extraction>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[CellValue]>,
{
    let mut extraction = Extraction::default();

    for (offset, row) in rows.into_iter().enumerate() {
        let reader = RowReader {
            cells: row.as_ref(),
            row_number: first_row + offset,
            columns,
        };
        let class = reader.to_class()?;

        extraction.term_ids.insert(class.term_id.clone());
        extraction.classes.push(class);
    }

    Ok(extraction)
}

// 单行读取器
struct RowReader<'a> {
    cells: &'a [CellValue],
    row_number: usize,
    columns: &'a ResolvedColumns,
}

impl RowReader<'_> {
    fn to_class(&self) -> ParseResult<ClassToRegister> {
        Ok(ClassToRegister {
            class_id: self.text(ClassAttribute::ClassId)?,
            second_class_id: self.text(ClassAttribute::SecondClassId)?,
            learn_day_number: self.integer(ClassAttribute::LearnDayNumber)?,
            class_type: self.text(ClassAttribute::ClassType)?,
            subject_id: self.text(ClassAttribute::SubjectId)?,
            subject_name: self.text(ClassAttribute::SubjectName)?,
            learn_at_day_of_week: self.integer(ClassAttribute::LearnAtDayOfWeek)?,
            learn_time: self.text(ClassAttribute::LearnTime)?,
            learn_room: self.text(ClassAttribute::LearnRoom)?,
            learn_week: self.text(ClassAttribute::LearnWeek)?,
            describe: self.text(ClassAttribute::Describe)?,
            term_id: self.text(ClassAttribute::TermId)?,
        })
    }

    fn cell(&self, attribute: ClassAttribute) -> ParseResult<&CellValue> {
        let column = self
            .columns
            .column(attribute)
            .ok_or(ParseError::UnresolvedColumn {
                row: self.row_number,
                attribute,
            })?;

        self.cells.get(column).ok_or(ParseError::ColumnOutOfRange {
            row: self.row_number,
            attribute,
            column,
            width: self.cells.len(),
        })
    }

    fn text(&self, attribute: ClassAttribute) -> ParseResult<String> {
        Ok(self.cell(attribute)?.to_text())
    }

    fn integer(&self, attribute: ClassAttribute) -> ParseResult<i64> {
        let cell = self.cell(attribute)?;
        cell.to_integer().ok_or_else(|| ParseError::TypeCoercion {
            row: self.row_number,
            attribute,
            value: cell.to_text(),
        })
    }
}
