use super::entities::Grade;
use serde::Serialize;

// 成绩列表响应
#[derive(Debug, Serialize)]
pub struct GradeListResponse {
    pub grades: Vec<Grade>,
}
