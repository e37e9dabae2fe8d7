use serde::Deserialize;

// 分配教师到班级
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignTeacherRequest {
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
}

// 分配学生到班级
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignStudentRequest {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}
