use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::ClassService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::classes::{entities::Class, requests::UpdateClassRequest};
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, required_text, validate_class_code};

pub async fn update_class_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    class_id: i64,
    req: UpdateClassRequest,
) -> Result<Class> {
    // 出现的字段按创建时的规则校验
    let class_code = match req.class_code {
        Some(code) => {
            let code = required_text("class_code", Some(code))?;
            check(validate_class_code(&code))?;
            Some(code)
        }
        None => None,
    };

    policy::ensure(actor, Action::Class(Operation::Update), PolicyContext::default())?;

    let repo = Repository::new(conn);
    let existing = require_class(&repo, class_id).await?;

    let Some(class_code) = class_code else {
        return Ok(existing);
    };

    if class_code == existing.class_code {
        return Ok(existing);
    }

    if let Some(other) = repo.find_class_by_code(&class_code).await?
        && other.id != class_id
    {
        return Err(SchoolError::duplicate_identity(format!(
            "Class code already exists: {class_code}"
        )));
    }

    repo.update_class_code(class_id, &class_code).await
}

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let class = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { update_class_in(txn, &actor, class_id, update_data).await })
    })
    .await?;

    info!("Class {} updated by user {}", class.id, actor.id);
    Ok(HttpResponse::Ok().json(class))
}
