// ==========================================
// 课表解析 Worker - 工作簿解码器
// ==========================================
// 职责: 原始字节（xlsx/xls/ods）→ 第一张工作表 → 逐行 CellValue
// 依赖: calamine
// ==========================================

use crate::domain::CellValue;
use crate::importer::error::{DecodeError, DecodeResult};
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader};
use chrono::Timelike;
use std::io::Cursor;

/// 已解码的工作表
pub struct DecodedSheet {
    name: String,
    range: Range<Data>,
}

impl DecodedSheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 行数
    pub fn height(&self) -> usize {
        self.range.height()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.range.width()
    }

    /// 首个已用行在工作表中的行号（1 起始）
    ///
    /// calamine 会裁掉前导空行，`rows()` 的第一行不一定是工作表第 1 行
    pub fn first_row(&self) -> usize {
        self.range
            .start()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(1)
    }

    /// 自顶向下的惰性行流
    pub fn rows(&self) -> impl Iterator<Item = Vec<CellValue>> + '_ {
        self.range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
    }
}

/// 解码工作簿字节，取第一张工作表
pub fn decode_first_sheet(bytes: &[u8]) -> DecodeResult<DecodedSheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&name)?;

    tracing::debug!(
        sheet = %name,
        start = ?range.start(),
        max_row = range.height(),
        max_column = range.width(),
        "工作表解码完成"
    );

    Ok(DecodedSheet { name, range })
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                CellValue::DateTime(render_excel_datetime(dt).unwrap_or_else(|| data.to_string()))
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateTime(s.clone()),
            Data::Error(_) => CellValue::Error(data.to_string()),
        }
    }
}

/// Excel 序列日期 → ISO 文本
///
/// - 纯时间（序列值 < 1）: `HH:MM:SS`
/// - 零点: `YYYY-MM-DD`
/// - 其余: `YYYY-MM-DDTHH:MM:SS`
fn render_excel_datetime(dt: &ExcelDateTime) -> Option<String> {
    if dt.is_duration() {
        return None;
    }
    let value = dt.as_datetime()?;

    let text = if dt.as_f64() < 1.0 {
        value.format("%H:%M:%S").to_string()
    } else if value.num_seconds_from_midnight() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_cell_value() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(
            CellValue::from(&Data::String("Kỳ".to_string())),
            CellValue::from("Kỳ")
        );
        assert_eq!(CellValue::from(&Data::Float(3.0)), CellValue::Float(3.0));
        assert_eq!(CellValue::from(&Data::Int(3)), CellValue::Int(3));
    }

    #[test]
    fn test_excel_dates_render_as_iso_text() {
        use calamine::ExcelDateTimeType;

        let cell = |serial: f64| {
            CellValue::from(&Data::DateTime(ExcelDateTime::new(
                serial,
                ExcelDateTimeType::DateTime,
                false,
            )))
        };

        assert_eq!(cell(0.28125), CellValue::DateTime("06:45:00".to_string()));
        assert_eq!(cell(45537.0), CellValue::DateTime("2024-09-02".to_string()));
        assert_eq!(
            cell(45537.5),
            CellValue::DateTime("2024-09-02T12:00:00".to_string())
        );
        assert_eq!(
            CellValue::from(&Data::DateTimeIso("2024-09-02T07:00:00".to_string())),
            CellValue::DateTime("2024-09-02T07:00:00".to_string())
        );
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_first_sheet(b"definitely not a workbook");
        assert!(matches!(result, Err(DecodeError::Workbook(_))));
    }
}
