use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{CreateGradeRequest, GradeListQuery, UpdateGradeRequest};
use crate::services::GradeService;
use crate::utils::SafeIdI64;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, query.into_inner()).await
}

pub async fn create_grade(
    req: HttpRequest,
    data: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(&req, data.into_inner()).await
}

pub async fn get_grade(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(&req, id.0).await
}

pub async fn update_grade(
    req: HttpRequest,
    id: SafeIdI64,
    data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(&req, id.0).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/grades")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(list_grades))
            .route(web::post().to(create_grade)),
    )
    .service(
        web::resource("/api/grades/{id}")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(get_grade))
            .route(web::put().to(update_grade))
            .route(web::delete().to(delete_grade)),
    );
}
