use super::entities::Class;
use serde::Serialize;

// 班级列表响应
#[derive(Debug, Serialize)]
pub struct ClassListResponse {
    pub classes: Vec<Class>,
}
