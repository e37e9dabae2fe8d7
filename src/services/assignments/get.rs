use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::AssignmentService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::assignments::entities::Assignment;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

/// 解析作业，不存在时返回 NotFound
pub(crate) async fn require_assignment<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    assignment_id: i64,
) -> Result<Assignment> {
    repo.find_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("Assignment {assignment_id} not found")))
}

pub async fn get_assignment_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    assignment_id: i64,
) -> Result<Assignment> {
    policy::ensure(
        actor,
        Action::Assignment(Operation::View),
        PolicyContext::default(),
    )?;
    require_assignment(&Repository::new(conn), assignment_id).await
}

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let assignment = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { get_assignment_in(txn, &actor, assignment_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(assignment))
}
