use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::UserService;
use super::create::{ensure_username_available, insert_validated, validate_user};
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::users::{
    entities::User,
    requests::{CreateUserRequest, CreateUsersRequest},
    responses::CreateUsersResponse,
};
use crate::policy::{self, Action, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

/// 给批量中的单条错误加上下标
fn at_index(index: usize, err: SchoolError) -> SchoolError {
    let message = format!("users[{index}]: {}", err.message());
    match err {
        SchoolError::Validation(_) => SchoolError::validation(message),
        SchoolError::DuplicateIdentity(_) => SchoolError::duplicate_identity(message),
        SchoolError::Forbidden(_) => SchoolError::forbidden(message),
        other => other,
    }
}

/// 批量创建用户
///
/// 先对全部条目做校验、权限判定与用户名唯一性检查（包括批内重复），
/// 全部通过后才开始写入。必须在事务中调用，写入阶段的失败依赖回滚。
pub async fn create_users_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    items: Vec<CreateUserRequest>,
) -> Result<Vec<User>> {
    if items.is_empty() {
        return Err(SchoolError::validation("users must not be empty"));
    }

    let repo = Repository::new(conn);
    let mut seen = HashSet::with_capacity(items.len());
    let mut validated = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let user = validate_user(item).map_err(|e| at_index(index, e))?;

        policy::ensure(actor, Action::CreateUser(user.role), PolicyContext::default())
            .map_err(|e| at_index(index, e))?;

        if !seen.insert(user.username.clone()) {
            return Err(at_index(
                index,
                SchoolError::duplicate_identity(format!(
                    "Username repeated in batch: {}",
                    user.username
                )),
            ));
        }

        ensure_username_available(&repo, &user.username)
            .await
            .map_err(|e| at_index(index, e))?;

        validated.push(user);
    }

    let mut created = Vec::with_capacity(validated.len());
    for user in validated {
        created.push(insert_validated(&repo, user).await?);
    }

    Ok(created)
}

pub async fn create_users(
    service: &UserService,
    users_data: CreateUsersRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);
    let items = users_data.into_items();

    let created = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_users_in(txn, &actor, items).await })
    })
    .await?;

    info!("{} users created in batch by user {}", created.len(), actor.id);
    Ok(HttpResponse::Created().json(CreateUsersResponse {
        message: "Users created successfully".to_string(),
        count: created.len(),
    }))
}
