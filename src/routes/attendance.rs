use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::services::AttendanceService;
use crate::utils::SafeIdI64;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(&req, query.into_inner())
        .await
}

pub async fn create_attendance(
    req: HttpRequest,
    data: web::Json<CreateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_attendance(&req, data.into_inner())
        .await
}

pub async fn get_attendance(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(&req, id.0).await
}

pub async fn update_attendance(
    req: HttpRequest,
    id: SafeIdI64,
    data: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_attendance(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(&req, id.0).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/attendance")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(list_attendance))
            .route(web::post().to(create_attendance)),
    )
    .service(
        web::resource("/api/attendance/{id}")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(get_attendance))
            .route(web::put().to(update_attendance))
            .route(web::delete().to(delete_attendance)),
    );
}
