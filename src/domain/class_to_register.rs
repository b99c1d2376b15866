// ==========================================
// 课表解析 Worker - 待注册班级记录
// ==========================================
// 职责: 抽取结果实体 + 结果信封（发布到结果队列的 JSON）
// ==========================================

use serde::{Deserialize, Serialize};

/// 待注册班级（每个数据行产出一条，构造后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassToRegister {
    pub class_id: String,
    pub second_class_id: String,
    pub learn_day_number: i64,
    pub class_type: String,
    pub subject_id: String,
    pub subject_name: String,
    pub learn_at_day_of_week: i64,
    pub learn_time: String,
    pub learn_room: String,
    pub learn_week: String,
    pub describe: String,
    pub term_id: String,
}

/// 结果信封: `{"data": [ClassToRegister, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub data: Vec<ClassToRegister>,
}

impl ResultEnvelope {
    pub fn new(data: Vec<ClassToRegister>) -> Self {
        Self { data }
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
