// ==========================================
// 课表解析 Worker - 单元格值
// ==========================================
// 职责: 表格行中的异构/可空单元格值，及其字符串化与类型转换规则
// ==========================================

use std::fmt;

/// 单元格值（由外部表格解码组件产出）
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 空单元格（NULL）
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// 日期时间（保留解码器给出的文本形式）
    DateTime(String),
    /// 公式错误（如 #DIV/0!）
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 字符串化（用于表头匹配，不做 TRIM）
    pub fn stringify(&self) -> String {
        self.to_text()
    }

    /// 字符串透传，NULL → 空串
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => match integral_f64(*f) {
                Some(i) => i.to_string(),
                None => f.to_string(),
            },
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(s) | CellValue::Error(s) => s.clone(),
        }
    }

    /// 整数转换
    ///
    /// # 返回
    /// - Some(i64): Int 原值 / 整数值的 Float / 可解析为整数的文本
    /// - None: 其余情况（含空单元格、带小数的数值）
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => integral_f64(*f),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_f64))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

// i64 可精确表示范围内的整数值浮点
fn integral_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}
