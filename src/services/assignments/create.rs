use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::{AssignmentService, normalize_description};
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, NewAssignment},
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, parse_due_date, required, required_text, validate_title};

pub async fn create_assignment_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let title = required_text("title", req.title)?;
    let due_date = parse_due_date(&required_text("due_date", req.due_date)?)?;
    let class_id = required("class_id", req.class_id)?;
    check(validate_title(&title))?;

    policy::ensure(
        actor,
        Action::Assignment(Operation::Create),
        PolicyContext::default(),
    )?;

    let repo = Repository::new(conn);
    require_class(&repo, class_id).await?;

    repo.insert_assignment(NewAssignment {
        class_id,
        title,
        description: normalize_description(req.description),
        due_date,
    })
    .await
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let assignment = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_assignment_in(txn, &actor, data).await })
    })
    .await?;

    info!(
        "Assignment {} created in class {} by user {}",
        assignment.id, assignment.class_id, actor.id
    );
    Ok(HttpResponse::Created().json(assignment))
}
