use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::UserService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::users::{
    entities::{User, UserRole},
    requests::{CreateUserRequest, NewUser},
    responses::CreateUserResponse,
};
use crate::policy::{self, Action, PolicyContext};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{
    check, required_text, validate_full_name, validate_password, validate_username,
};

/// 校验通过、尚未哈希的用户
#[derive(Debug, Clone)]
pub(crate) struct ValidatedUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

/// 校验必填字段与格式，角色缺失或无效都是 Validation 错误
pub(crate) fn validate_user(req: CreateUserRequest) -> Result<ValidatedUser> {
    let username = required_text("username", req.username)?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SchoolError::validation("password is required"))?;
    let full_name = required_text("full_name", req.full_name)?;
    let role = required_text("role", req.role)?
        .parse::<UserRole>()
        .map_err(SchoolError::validation)?;

    check(validate_username(&username))?;
    check(validate_password(&password))?;
    check(validate_full_name(&full_name))?;

    Ok(ValidatedUser {
        username,
        password,
        full_name,
        role,
    })
}

/// 用户名唯一性预检
pub(crate) async fn ensure_username_available<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    username: &str,
) -> Result<()> {
    if repo.find_user_by_username(username).await?.is_some() {
        return Err(SchoolError::duplicate_identity(format!(
            "Username already exists: {username}"
        )));
    }
    Ok(())
}

/// 哈希密码并写入
pub(crate) async fn insert_validated<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    user: ValidatedUser,
) -> Result<User> {
    let password_hash = hash_password_blocking(user.password).await?;
    repo.insert_user(NewUser {
        username: user.username,
        password_hash,
        full_name: user.full_name,
        role: user.role,
    })
    .await
}

pub async fn create_user_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    req: CreateUserRequest,
) -> Result<User> {
    let repo = Repository::new(conn);
    let user = validate_user(req)?;

    policy::ensure(actor, Action::CreateUser(user.role), PolicyContext::default())?;
    ensure_username_available(&repo, &user.username).await?;

    insert_validated(&repo, user).await
}

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let user = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_user_in(txn, &actor, user_data).await })
    })
    .await?;

    info!(
        "User {} ({}) created by user {}",
        user.username, user.role, actor.id
    );
    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing;
    use crate::utils::password::verify_password;

    fn payload(username: &str, role: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some(username.to_string()),
            password: Some("s3cret-pass".to_string()),
            full_name: Some(format!("{username} name")),
            role: Some(role.to_string()),
        }
    }

    #[tokio::test]
    async fn test_admin_creates_any_role() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let actor = Actor::from(&admin);

        for (name, role) in [("t1", "teacher"), ("s1", "student"), ("a2", "admin")] {
            let user = create_user_in(&db, &actor, payload(name, role)).await.unwrap();
            assert_eq!(user.role.to_string(), role);
            assert!(verify_password("s3cret-pass", &user.password_hash));
        }
    }

    #[tokio::test]
    async fn test_teacher_creates_only_students() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let actor = Actor::from(&teacher);

        assert!(
            create_user_in(&db, &actor, payload("pupil", "student"))
                .await
                .is_ok()
        );
        let err = create_user_in(&db, &actor, payload("peer", "teacher"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
        let err = create_user_in(&db, &actor, payload("boss", "admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
        assert!(
            Repository::new(&db)
                .find_user_by_username("peer")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_student_cannot_create_users() {
        let db = testing::memory_db().await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let err = create_user_in(&db, &Actor::from(&student), payload("x", "student"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_duplicate_username_for_every_role() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        testing::seed_user(&db, "taken", UserRole::Student).await;
        let actor = Actor::from(&admin);

        for role in ["teacher", "student", "admin"] {
            let err = create_user_in(&db, &actor, payload("taken", role))
                .await
                .unwrap_err();
            assert!(matches!(err, SchoolError::DuplicateIdentity(_)), "{role}");
        }
    }

    #[tokio::test]
    async fn test_missing_or_invalid_role() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let actor = Actor::from(&admin);

        let mut req = payload("norole", "student");
        req.role = None;
        let err = create_user_in(&db, &actor, req).await.unwrap_err();
        assert_eq!(err, SchoolError::validation("role is required"));

        let err = create_user_in(&db, &actor, payload("badrole", "janitor"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let actor = Actor::from(&admin);

        let err = create_user_in(&db, &actor, CreateUserRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, SchoolError::validation("username is required"));

        let mut req = payload("nopass", "student");
        req.password = Some(String::new());
        let err = create_user_in(&db, &actor, req).await.unwrap_err();
        assert_eq!(err, SchoolError::validation("password is required"));
    }
}
