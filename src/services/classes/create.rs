use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::ClassService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::classes::{entities::Class, requests::CreateClassRequest};
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, required_text, validate_class_code};

pub async fn create_class_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    req: CreateClassRequest,
) -> Result<Class> {
    let class_code = required_text("class_code", req.class_code)?;
    check(validate_class_code(&class_code))?;

    policy::ensure(actor, Action::Class(Operation::Create), PolicyContext::default())?;

    let repo = Repository::new(conn);
    if repo.find_class_by_code(&class_code).await?.is_some() {
        return Err(SchoolError::duplicate_identity(format!(
            "Class code already exists: {class_code}"
        )));
    }

    repo.insert_class(&class_code).await
}

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let class = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_class_in(txn, &actor, class_data).await })
    })
    .await?;

    info!("Class {} created by user {}", class.class_code, actor.id);
    Ok(HttpResponse::Created().json(class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;

    fn code(c: &str) -> CreateClassRequest {
        CreateClassRequest {
            class_code: Some(c.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_class_rules() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let actor = Actor::from(&admin);

        create_class_in(&db, &actor, code("CS101")).await.unwrap();

        let err = create_class_in(&db, &actor, code("CS101"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::DuplicateIdentity(_)));

        let err = create_class_in(&db, &actor, CreateClassRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, SchoolError::validation("class_code is required"));

        let err = create_class_in(&db, &actor, code("WAY-TOO-LONG"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));

        let err = create_class_in(&db, &Actor::from(&student), code("BIO"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
    }
}
