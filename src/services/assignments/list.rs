use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::AssignmentService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::assignments::{
    entities::Assignment, requests::AssignmentListQuery, responses::AssignmentListResponse,
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn list_assignments_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    query: AssignmentListQuery,
) -> Result<Vec<Assignment>> {
    policy::ensure(
        actor,
        Action::Assignment(Operation::View),
        PolicyContext::default(),
    )?;
    Repository::new(conn).list_assignments(query.class_id).await
}

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListQuery,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let assignments = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { list_assignments_in(txn, &actor, query).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(AssignmentListResponse { assignments }))
}
