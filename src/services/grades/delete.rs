use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::get::require_grade;
use super::{GradeService, ensure_grade_write};
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::MessageResponse;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation};
use crate::storage::{Repository, run_in_transaction};

pub async fn delete_grade_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    grade_id: i64,
) -> Result<()> {
    policy::ensure_role_may(actor, Action::Grade(Operation::Delete))?;

    let repo = Repository::new(conn);
    let grade = require_grade(&repo, grade_id).await?;
    ensure_grade_write(&repo, actor, Operation::Delete, grade.assignment_id).await?;

    repo.delete_grade(grade_id).await?;
    Ok(())
}

pub async fn delete_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { delete_grade_in(txn, &actor, grade_id).await })
    })
    .await?;

    info!("Grade {} deleted by user {}", grade_id, actor.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Grade deleted successfully")))
}
