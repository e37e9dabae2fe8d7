use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::requests::{CreateUserRequest, CreateUsersRequest};
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(&req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn create_users(
    req: HttpRequest,
    users_data: web::Json<CreateUsersRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_users(users_data.into_inner(), &req).await
}

// 配置路由（角色判定在服务层完成）
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/get_users")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(list_users)),
    )
    .service(
        web::resource("/api/create_user")
            .wrap(middlewares::RequireSession)
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/api/create_users")
            .wrap(middlewares::RequireSession)
            .route(web::post().to(create_users)),
    );
}
