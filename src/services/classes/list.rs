use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::ClassService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::classes::{entities::Class, responses::ClassListResponse};
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn list_classes_in<C: ConnectionTrait>(conn: &C, actor: &Actor) -> Result<Vec<Class>> {
    policy::ensure(actor, Action::Class(Operation::View), PolicyContext::default())?;
    Repository::new(conn).list_classes().await
}

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let classes = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { list_classes_in(txn, &actor).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ClassListResponse { classes }))
}
