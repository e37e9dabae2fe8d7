use serde::Deserialize;

use super::entities::AttendanceStatus;

// 记录考勤请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAttendanceRequest {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date: Option<String>,
    pub status: Option<String>,
}

// 更新考勤请求（缺失字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date: Option<String>,
    pub status: Option<String>,
}

// 考勤列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListQuery {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date: Option<String>,
}

// 校验后的新考勤（用于存储层）
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub class_id: i64,
    pub student_id: i64,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub recorded_by: i64,
}

// 存储层过滤条件
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub date: Option<chrono::NaiveDate>,
}
