use crate::models::users::entities::UserRole;
use serde::Serialize;

// 当前登录用户信息
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub role: UserRole,
}
