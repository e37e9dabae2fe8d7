use chrono::{DateTime, Utc};
use serde::Deserialize;

// 创建作业请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssignmentRequest {
    pub class_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

// 更新作业请求（缺失字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub class_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

// 作业列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentListQuery {
    pub class_id: Option<i64>,
}

// 校验后的新作业（用于存储层）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

// 校验后的作业变更（用于存储层），description 为 Some(None) 时清空描述
#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub class_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<DateTime<Utc>>,
}
