use super::entities::AttendanceRecord;
use serde::Serialize;

// 考勤列表响应
#[derive(Debug, Serialize)]
pub struct AttendanceListResponse {
    pub attendance: Vec<AttendanceRecord>,
}
