//! 访问控制策略
//!
//! 纯函数：`(角色, 动作, 上下文) -> Allow | Deny(原因)`，不依赖 HTTP 或存储。
//! 服务层负责准备上下文（例如教师是否被分配到目标班级），再调用这里做判定。

use crate::errors::{Result, SchoolError};
use crate::models::auth::entities::Actor;
use crate::models::users::entities::UserRole;

/// 针对实体的 CRUD 操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    Create,
    Update,
    Delete,
}

/// 受控动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// 创建指定角色的用户
    CreateUser(UserRole),
    ListUsers,
    Class(Operation),
    Assignment(Operation),
    Attendance(Operation),
    Grade(Operation),
    /// 分配教师或学生到班级
    AssignToClass,
    /// 查看班级/教师/学生聚合视图
    ViewMembership,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreateUser(role) => write!(f, "create_user({role})"),
            Action::ListUsers => write!(f, "list_users"),
            Action::Class(op) => write!(f, "class:{op:?}"),
            Action::Assignment(op) => write!(f, "assignment:{op:?}"),
            Action::Attendance(op) => write!(f, "attendance:{op:?}"),
            Action::Grade(op) => write!(f, "grade:{op:?}"),
            Action::AssignToClass => write!(f, "assign_to_class"),
            Action::ViewMembership => write!(f, "view_membership"),
        }
    }
}

/// 判定所需的上下文
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyContext {
    /// 操作者是否通过 TeacherClass 关联到目标班级
    pub assigned_to_class: bool,
}

impl PolicyContext {
    pub fn assigned(assigned_to_class: bool) -> Self {
        Self { assigned_to_class }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

pub const DENY_STUDENT: &str = "students may not perform this action";
pub const DENY_ADMIN_ONLY: &str = "only admins may perform this action";
pub const DENY_TEACHER_CREATE_USER: &str = "teachers may only create student accounts";
pub const DENY_NOT_ASSIGNED: &str = "not assigned to class";

/// 核心判定
pub fn authorize(role: UserRole, action: &Action, ctx: &PolicyContext) -> Decision {
    match role {
        UserRole::Admin => Decision::Allow,
        UserRole::Student => Decision::Deny(DENY_STUDENT),
        UserRole::Teacher => match action {
            Action::CreateUser(UserRole::Student) => Decision::Allow,
            Action::CreateUser(_) => Decision::Deny(DENY_TEACHER_CREATE_USER),
            Action::ListUsers
            | Action::Class(_)
            | Action::Assignment(_)
            | Action::Attendance(Operation::View)
            | Action::Grade(Operation::View) => Decision::Allow,
            // 考勤与成绩的写操作限定在所教班级
            Action::Attendance(_) | Action::Grade(_) => {
                if ctx.assigned_to_class {
                    Decision::Allow
                } else {
                    Decision::Deny(DENY_NOT_ASSIGNED)
                }
            }
            Action::AssignToClass | Action::ViewMembership => Decision::Deny(DENY_ADMIN_ONLY),
        },
    }
}

/// 是否存在某个上下文使该角色被允许执行动作
pub fn role_may(role: UserRole, action: &Action) -> bool {
    authorize(role, action, &PolicyContext::assigned(true)).is_allowed()
}

/// 判定并转换为 `Forbidden` 错误
pub fn ensure(actor: &Actor, action: Action, ctx: PolicyContext) -> Result<()> {
    match authorize(actor.role, &action, &ctx) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::info!(
                "Denied {} for user {} ({}): {}",
                action,
                actor.id,
                actor.role,
                reason
            );
            Err(SchoolError::forbidden(reason))
        }
    }
}

/// 在解析任何标识符之前做角色预检
pub fn ensure_role_may(actor: &Actor, action: Action) -> Result<()> {
    if role_may(actor.role, &action) {
        Ok(())
    } else {
        ensure(actor, action, PolicyContext::default())
    }
}
