use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::GradeService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::grades::entities::Grade;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

/// 解析成绩，不存在时返回 NotFound
pub(crate) async fn require_grade<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    grade_id: i64,
) -> Result<Grade> {
    repo.find_grade_by_id(grade_id)
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("Grade {grade_id} not found")))
}

pub async fn get_grade_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    grade_id: i64,
) -> Result<Grade> {
    policy::ensure(actor, Action::Grade(Operation::View), PolicyContext::default())?;
    require_grade(&Repository::new(conn), grade_id).await
}

pub async fn get_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let grade = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { get_grade_in(txn, &actor, grade_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(grade))
}
