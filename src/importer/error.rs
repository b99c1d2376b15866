// ==========================================
// 课表解析 Worker - 解析错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行号均为工作表内 1 起始行号
// ==========================================

use crate::domain::ClassAttribute;
use thiserror::Error;

/// 解析核心错误类型（任一错误都使整次解析失败，不产出部分结果）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("未找到表头行: 扫描 {scanned_rows} 行后仍无可识别的列名")]
    HeaderNotFound { scanned_rows: usize },

    #[error("列未解析 (行 {row}, 字段 {attribute}): 表头中未出现该列")]
    UnresolvedColumn {
        row: usize,
        attribute: ClassAttribute,
    },

    #[error("列越界 (行 {row}, 字段 {attribute}): 列索引 {column} 超出行宽 {width}")]
    ColumnOutOfRange {
        row: usize,
        attribute: ClassAttribute,
        column: usize,
        width: usize,
    },

    #[error("类型转换失败 (行 {row}, 字段 {attribute}): 无法解析为整数: {value:?}")]
    TypeCoercion {
        row: usize,
        attribute: ClassAttribute,
        value: String,
    },
}

impl ParseError {
    /// 出错的工作表行号（表头缺失时为 None）
    pub fn row(&self) -> Option<usize> {
        match self {
            ParseError::HeaderNotFound { .. } => None,
            ParseError::UnresolvedColumn { row, .. }
            | ParseError::ColumnOutOfRange { row, .. }
            | ParseError::TypeCoercion { row, .. } => Some(*row),
        }
    }
}

/// Result 类型别名
pub type ParseResult<T> = Result<T, ParseError>;

/// 工作簿解码错误（外部解码组件）
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Excel 解析失败: {0}")]
    Workbook(String),

    #[error("Excel 文件无工作表")]
    EmptyWorkbook,
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for DecodeError {
    fn from(err: calamine::Error) -> Self {
        DecodeError::Workbook(err.to_string())
    }
}

/// Result 类型别名
pub type DecodeResult<T> = Result<T, DecodeError>;
