use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::class_members::requests::{AssignStudentRequest, AssignTeacherRequest};
use crate::services::ClassMemberService;

// 懒加载的全局 ClassMemberService 实例
static CLASS_MEMBER_SERVICE: Lazy<ClassMemberService> = Lazy::new(ClassMemberService::new_lazy);

pub async fn assign_teacher(
    req: HttpRequest,
    data: web::Json<AssignTeacherRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE
        .assign_teacher(&req, data.into_inner())
        .await
}

pub async fn assign_student(
    req: HttpRequest,
    data: web::Json<AssignStudentRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE
        .assign_student(&req, data.into_inner())
        .await
}

pub async fn classes_and_teachers(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE.classes_and_teachers(&req).await
}

pub async fn students_and_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE.students_and_classes(&req).await
}

// 配置路由
pub fn configure_class_members_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/assign_teacher_to_class")
            .wrap(middlewares::RequireSession)
            .route(web::post().to(assign_teacher)),
    )
    .service(
        web::resource("/api/assign_student_to_class")
            .wrap(middlewares::RequireSession)
            .route(web::post().to(assign_student)),
    )
    .service(
        web::resource("/api/get_classes_and_teachers")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(classes_and_teachers)),
    )
    .service(
        web::resource("/api/get_students_and_classes")
            .wrap(middlewares::RequireSession)
            .route(web::get().to(students_and_classes)),
    );
}
