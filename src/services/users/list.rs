use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::UserService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::users::{entities::UserSummary, responses::UserListResponse};
use crate::policy::{self, Action, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn list_users_in<C: ConnectionTrait>(conn: &C, actor: &Actor) -> Result<Vec<UserSummary>> {
    policy::ensure(actor, Action::ListUsers, PolicyContext::default())?;

    let users = Repository::new(conn).list_users(None).await?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

pub async fn list_users(service: &UserService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let users = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { list_users_in(txn, &actor).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserListResponse { users }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchoolError;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;

    #[tokio::test]
    async fn test_list_users_by_role() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;

        let users = list_users_in(&db, &Actor::from(&admin)).await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].username, "root");

        assert_eq!(
            list_users_in(&db, &Actor::from(&teacher))
                .await
                .unwrap()
                .len(),
            3
        );

        let err = list_users_in(&db, &Actor::from(&student))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
    }
}
