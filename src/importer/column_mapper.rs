// ==========================================
// 课表解析 Worker - 列映射器
// ==========================================
// 职责: 表头行单元格 → 属性列索引表
// 两阶段: ColumnIndexBuilder（表头扫描期可变）→ ResolvedColumns（冻结只读）
// ==========================================

use crate::domain::{CellValue, ClassAttribute};
use crate::importer::vocabulary;

/// 属性列索引表（表头扫描阶段）
///
/// 初始全部未解析；同一属性只取第一次（最左）出现的列。
#[derive(Debug, Clone, Default)]
pub struct ColumnIndexBuilder {
    slots: [Option<usize>; ClassAttribute::COUNT],
}

impl ColumnIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用一行单元格更新索引表
    pub fn map_row(&mut self, row: &[CellValue]) {
        for (index, cell) in row.iter().enumerate() {
            let Some(attribute) = vocabulary::lookup(&cell.stringify()) else {
                continue;
            };

            let slot = &mut self.slots[attribute.slot()];
            if slot.is_none() {
                *slot = Some(index);
            }
        }
    }

    /// 是否至少解析出一个属性
    pub fn is_any_resolved(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// 冻结为只读索引表
    pub fn freeze(self) -> ResolvedColumns {
        ResolvedColumns { slots: self.slots }
    }
}

/// 冻结后的属性列索引表（只读）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    slots: [Option<usize>; ClassAttribute::COUNT],
}

impl ResolvedColumns {
    /// 属性所在列（None = 未解析）
    pub fn column(&self, attribute: ClassAttribute) -> Option<usize> {
        self.slots[attribute.slot()]
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// 未在表头中出现的属性
    pub fn missing(&self) -> Vec<ClassAttribute> {
        ClassAttribute::ALL
            .into_iter()
            .filter(|a| self.column(*a).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.resolved_count() == ClassAttribute::COUNT
    }
}
