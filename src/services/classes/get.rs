use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::ClassService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::classes::entities::Class;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};

pub async fn get_class_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    class_id: i64,
) -> Result<Class> {
    policy::ensure(actor, Action::Class(Operation::View), PolicyContext::default())?;
    require_class(&Repository::new(conn), class_id).await
}

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let class = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { get_class_in(txn, &actor, class_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(class))
}
