use crate::models::users::entities::{User, UserRole};

/// 当前请求的操作者
///
/// 核心层只关心 id 与角色，由会话中间件从存储中重新加载的 `User` 构造。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}
