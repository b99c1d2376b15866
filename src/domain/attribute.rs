// ==========================================
// 课表解析 Worker - 班级属性定义
// ==========================================
// 职责: 定义 ClassToRegister 的 12 个语义属性及其声明类型
// ==========================================

use std::fmt;

/// 属性声明类型（决定抽取时的类型转换）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// 字符串透传（NULL → 空串）
    Text,
    /// 整数
    Integer,
}

/// 待注册班级的语义属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassAttribute {
    TermId,
    ClassId,
    SecondClassId,
    SubjectId,
    SubjectName,
    LearnDayNumber,
    LearnAtDayOfWeek,
    LearnRoom,
    LearnTime,
    LearnWeek,
    ClassType,
    Describe,
}

impl ClassAttribute {
    /// 属性总数
    pub const COUNT: usize = 12;

    /// 全部属性（固定顺序，与索引表槽位一一对应）
    pub const ALL: [ClassAttribute; Self::COUNT] = [
        ClassAttribute::TermId,
        ClassAttribute::ClassId,
        ClassAttribute::SecondClassId,
        ClassAttribute::SubjectId,
        ClassAttribute::SubjectName,
        ClassAttribute::LearnDayNumber,
        ClassAttribute::LearnAtDayOfWeek,
        ClassAttribute::LearnRoom,
        ClassAttribute::LearnTime,
        ClassAttribute::LearnWeek,
        ClassAttribute::ClassType,
        ClassAttribute::Describe,
    ];

    /// 索引表槽位
    pub fn slot(self) -> usize {
        self as usize
    }

    /// 输出 JSON 中的字段名
    pub fn field_name(self) -> &'static str {
        match self {
            ClassAttribute::TermId => "term_id",
            ClassAttribute::ClassId => "class_id",
            ClassAttribute::SecondClassId => "second_class_id",
            ClassAttribute::SubjectId => "subject_id",
            ClassAttribute::SubjectName => "subject_name",
            ClassAttribute::LearnDayNumber => "learn_day_number",
            ClassAttribute::LearnAtDayOfWeek => "learn_at_day_of_week",
            ClassAttribute::LearnRoom => "learn_room",
            ClassAttribute::LearnTime => "learn_time",
            ClassAttribute::LearnWeek => "learn_week",
            ClassAttribute::ClassType => "class_type",
            ClassAttribute::Describe => "describe",
        }
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            ClassAttribute::LearnDayNumber | ClassAttribute::LearnAtDayOfWeek => {
                AttributeKind::Integer
            }
            _ => AttributeKind::Text,
        }
    }
}

impl fmt::Display for ClassAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_match_all_order() {
        for (i, attr) in ClassAttribute::ALL.iter().enumerate() {
            assert_eq!(attr.slot(), i);
        }
    }

    #[test]
    fn test_integer_attributes() {
        let integers: Vec<_> = ClassAttribute::ALL
            .iter()
            .filter(|a| a.kind() == AttributeKind::Integer)
            .map(|a| a.field_name())
            .collect();

        assert_eq!(integers, vec!["learn_day_number", "learn_at_day_of_week"]);
    }
}
