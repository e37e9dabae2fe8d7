use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::get::require_grade;
use super::{GradeService, ensure_grade_write};
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::grades::{entities::Grade, requests::UpdateGradeRequest};
use crate::policy::{self, Action, Operation};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, required, validate_score};

pub async fn update_grade_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    grade_id: i64,
    req: UpdateGradeRequest,
) -> Result<Grade> {
    let score = required("score", req.score)?;
    check(validate_score(score))?;

    policy::ensure_role_may(actor, Action::Grade(Operation::Update))?;

    let repo = Repository::new(conn);
    let grade = require_grade(&repo, grade_id).await?;
    ensure_grade_write(&repo, actor, Operation::Update, grade.assignment_id).await?;

    repo.update_grade_score(grade_id, score).await
}

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    data: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let grade = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { update_grade_in(txn, &actor, grade_id, data).await })
    })
    .await?;

    info!("Grade {} updated by user {}", grade.id, actor.id);
    Ok(HttpResponse::Ok().json(grade))
}
