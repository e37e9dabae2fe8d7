use super::entities::Assignment;
use serde::Serialize;

// 作业列表响应
#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<Assignment>,
}
