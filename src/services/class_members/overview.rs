use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::ClassMemberService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::class_members::responses::{
    ClassWithTeachers, ClassesAndTeachersResponse, StudentWithClasses,
    StudentsAndClassesResponse,
};
use crate::policy::{self, Action, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn classes_and_teachers_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
) -> Result<Vec<ClassWithTeachers>> {
    policy::ensure(actor, Action::ViewMembership, PolicyContext::default())?;
    Repository::new(conn).classes_with_teachers().await
}

pub async fn students_and_classes_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
) -> Result<Vec<StudentWithClasses>> {
    policy::ensure(actor, Action::ViewMembership, PolicyContext::default())?;
    Repository::new(conn).students_with_classes().await
}

pub async fn classes_and_teachers(
    service: &ClassMemberService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let classes = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { classes_and_teachers_in(txn, &actor).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ClassesAndTeachersResponse { classes }))
}

pub async fn students_and_classes(
    service: &ClassMemberService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let students = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { students_and_classes_in(txn, &actor).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(StudentsAndClassesResponse { students }))
}
