use super::entities::{User, UserSummary};
use serde::Serialize;

// 用户创建响应
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

// 批量创建响应
#[derive(Debug, Serialize)]
pub struct CreateUsersResponse {
    pub message: String,
    pub count: usize,
}

// 用户列表响应
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}
