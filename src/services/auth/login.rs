use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;

use crate::errors::{Result, SchoolError};
use crate::models::MessageResponse;
use crate::models::auth::requests::LoginRequest;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::{hash_password, verify_password_blocking};

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Username or password is incorrect";

// 用户不存在时也做一次哈希校验，响应时间与密码错误一致
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("dummy-password-for-timing").unwrap_or_default());

/// 取出占位哈希；首次求值要做一次 Argon2 计算，放在阻塞线程池中进行
async fn dummy_hash() -> Result<String> {
    tokio::task::spawn_blocking(|| DUMMY_HASH.clone())
        .await
        .map_err(|e| SchoolError::internal(format!("Dummy hash task failed: {e}")))
}

/// 启动时预先计算占位哈希，避免首个未知用户的登录承担这次计算
pub async fn warm_up_dummy_hash() -> Result<()> {
    if dummy_hash().await?.is_empty() {
        return Err(SchoolError::internal("Failed to prepare dummy password hash"));
    }
    Ok(())
}

/// 校验用户名与密码，未知用户与错误密码返回同一个错误
pub async fn authenticate(storage: &dyn Storage, username: &str, password: &str) -> Result<User> {
    let user = storage.get_user_by_username(username).await?;

    let hash = match &user {
        Some(user) => user.password_hash.clone(),
        None => dummy_hash().await?,
    };
    let verified = verify_password_blocking(password.to_string(), hash).await;

    match user {
        Some(user) if verified => Ok(user),
        _ => Err(SchoolError::authentication(INVALID_CREDENTIALS)),
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 校验必填字段
    let (Some(username), Some(password)) = (login_request.username, login_request.password) else {
        return Err(SchoolError::validation("username and password are required").into());
    };

    // 2. 验证用户名与密码
    let user = authenticate(storage.as_ref(), username.trim(), &password).await?;

    // 3. 签发会话令牌
    let token = JwtUtils::generate_session_token(&user).map_err(|e| {
        SchoolError::internal(format!("Failed to generate session token: {e}"))
    })?;

    tracing::info!("User {} logged in successfully", user.username);

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_session_cookie(&token))
        .json(MessageResponse::new("Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::NewUser};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, testing};

    async fn storage_with_user() -> SeaOrmStorage {
        let db = testing::memory_db().await;
        let storage = SeaOrmStorage::from_connection(db);
        storage
            .create_user(NewUser {
                username: "alice".into(),
                password_hash: hash_password("wonderland").unwrap(),
                full_name: "Alice".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let storage = storage_with_user().await;
        let user = authenticate(&storage, "alice", "wonderland").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let storage = storage_with_user().await;
        let wrong_password = authenticate(&storage, "alice", "looking-glass")
            .await
            .unwrap_err();
        let unknown_user = authenticate(&storage, "mallory", "wonderland")
            .await
            .unwrap_err();
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(
            wrong_password,
            SchoolError::authentication(INVALID_CREDENTIALS)
        );
    }

    #[tokio::test]
    async fn test_dummy_hash_is_ready_for_unknown_users() {
        warm_up_dummy_hash().await.unwrap();
        assert!(DUMMY_HASH.starts_with("$argon2id$"));

        let storage = storage_with_user().await;
        let err = authenticate(&storage, "nobody", "dummy-password-for-timing")
            .await
            .unwrap_err();
        assert_eq!(err, SchoolError::authentication(INVALID_CREDENTIALS));
    }
}
