use serde::Deserialize;

// 录入成绩请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGradeRequest {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub score: Option<f64>,
}

// 更新成绩请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGradeRequest {
    pub score: Option<f64>,
}

// 成绩列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeListQuery {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}

// 存储层过滤条件
#[derive(Debug, Clone, Default)]
pub struct GradeFilter {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}
