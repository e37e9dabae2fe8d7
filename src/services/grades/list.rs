use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::GradeService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::grades::{
    entities::Grade,
    requests::{GradeFilter, GradeListQuery},
    responses::GradeListResponse,
};
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn list_grades_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    query: GradeListQuery,
) -> Result<Vec<Grade>> {
    policy::ensure(actor, Action::Grade(Operation::View), PolicyContext::default())?;

    Repository::new(conn)
        .list_grades(GradeFilter {
            assignment_id: query.assignment_id,
            student_id: query.student_id,
        })
        .await
}

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let grades = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { list_grades_in(txn, &actor, query).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(GradeListResponse { grades }))
}
