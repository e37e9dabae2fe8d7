//! 业务服务
//!
//! 每个操作分两层：
//! - `*_in` 函数接收连接或事务、当前操作者与请求体，负责校验、权限判定与读写；
//! - 同名的 HTTP 处理函数提取会话用户，在单个事务中调用 `*_in`，并把结果转换为响应。

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod class_members;
pub mod classes;
pub mod grades;
pub mod users;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use class_members::ClassMemberService;
pub use classes::ClassService;
pub use grades::GradeService;
pub use users::UserService;

use sea_orm::ConnectionTrait;

use crate::errors::{Result, SchoolError};
use crate::models::auth::entities::Actor;
use crate::models::classes::entities::Class;
use crate::models::users::entities::{User, UserRole};
use crate::policy::PolicyContext;
use crate::storage::Repository;

/// 教师是否关联到班级；其他角色的判定不依赖该上下文
pub(crate) async fn class_context<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    actor: &Actor,
    class_id: i64,
) -> Result<PolicyContext> {
    let assigned = match actor.role {
        UserRole::Teacher => repo.teacher_link_exists(actor.id, class_id).await?,
        _ => false,
    };
    Ok(PolicyContext::assigned(assigned))
}

/// 解析班级，不存在时返回 NotFound
pub(crate) async fn require_class<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    class_id: i64,
) -> Result<Class> {
    repo.find_class_by_id(class_id)
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("Class {class_id} not found")))
}

/// 解析学生：必须存在、角色为学生且已加入班级
pub(crate) async fn require_enrolled_student<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    student_id: i64,
    class_id: i64,
) -> Result<User> {
    let student = repo
        .find_user_by_id(student_id)
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("Student {student_id} not found")))?;

    if student.role != UserRole::Student {
        return Err(SchoolError::validation(format!(
            "User {student_id} is not a student"
        )));
    }

    if !repo.student_link_exists(student_id, class_id).await? {
        return Err(SchoolError::validation(format!(
            "Student {student_id} is not enrolled in class {class_id}"
        )));
    }

    Ok(student)
}
