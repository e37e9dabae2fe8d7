use serde::Serialize;

use super::entities::ClassLink;
use crate::models::classes::entities::Class;
use crate::models::users::entities::UserSummary;

// 分配响应
#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ClassLink>,
}

// 班级及其教师
#[derive(Debug, Serialize, PartialEq)]
pub struct ClassWithTeachers {
    pub id: i64,
    pub class_code: String,
    pub teachers: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct ClassesAndTeachersResponse {
    pub classes: Vec<ClassWithTeachers>,
}

// 学生及其所在班级
#[derive(Debug, Serialize, PartialEq)]
pub struct StudentWithClasses {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub classes: Vec<Class>,
}

#[derive(Debug, Serialize)]
pub struct StudentsAndClassesResponse {
    pub students: Vec<StudentWithClasses>,
}
