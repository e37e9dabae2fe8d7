use super::entities::UserRole;
use serde::Deserialize;

// 用户创建请求
//
// 字段全部为可选，缺失字段由服务层统一返回 400，
// 而不是在反序列化阶段失败。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

// 批量创建请求，支持 `[...]` 或 `{"users": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateUsersRequest {
    List(Vec<CreateUserRequest>),
    Wrapped { users: Vec<CreateUserRequest> },
}

impl CreateUsersRequest {
    pub fn into_items(self) -> Vec<CreateUserRequest> {
        match self {
            Self::List(items) => items,
            Self::Wrapped { users } => users,
        }
    }
}

// 校验并哈希后的新用户（用于存储层）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
}
