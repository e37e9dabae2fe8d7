use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级代码（唯一）
    pub class_code: String,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
