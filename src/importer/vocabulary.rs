// ==========================================
// 课表解析 Worker - 表头词表
// ==========================================
// 职责: 表头单元格文本 → 语义属性（进程级只读常量）
// 规则: 精确匹配，区分大小写，不做 TRIM
// ==========================================

use crate::domain::ClassAttribute;

/// 表头词表（12 项）
pub const HEADER_VOCABULARY: [(&str, ClassAttribute); ClassAttribute::COUNT] = [
    ("Kỳ", ClassAttribute::TermId),
    ("Mã_lớp", ClassAttribute::ClassId),
    ("Mã_lớp_kèm", ClassAttribute::SecondClassId),
    ("Mã_HP", ClassAttribute::SubjectId),
    ("Tên_HP", ClassAttribute::SubjectName),
    ("Buổi_số", ClassAttribute::LearnDayNumber),
    ("Thứ", ClassAttribute::LearnAtDayOfWeek),
    ("Phòng", ClassAttribute::LearnRoom),
    ("Thời_gian", ClassAttribute::LearnTime),
    ("Tuần", ClassAttribute::LearnWeek),
    ("Loại_lớp", ClassAttribute::ClassType),
    ("Ghi_chú", ClassAttribute::Describe),
];

/// 查找表头文本对应的属性
pub fn lookup(header_text: &str) -> Option<ClassAttribute> {
    HEADER_VOCABULARY
        .iter()
        .find(|(text, _)| *text == header_text)
        .map(|(_, attribute)| *attribute)
}

/// 属性对应的表头文本
pub fn header_text(attribute: ClassAttribute) -> &'static str {
    HEADER_VOCABULARY
        .iter()
        .find(|(_, a)| *a == attribute)
        .map(|(text, _)| *text)
        .unwrap_or_default()
}
