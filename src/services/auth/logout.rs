use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::MessageResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
/// 通过设置空的会话 cookie 来清除客户端的登录状态
pub async fn handle_logout() -> ActixResult<HttpResponse> {
    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_session_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(MessageResponse::new("Logout successful")))
}
