/*!
 * 会话认证中间件
 *
 * 校验会话令牌（`session` Cookie 或 `Authorization: Bearer <token>`），
 * 并在每个请求中从存储重新加载用户，角色变更与删除立即生效。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api")
 *     .wrap(RequireSession)
 *     .route("/profile", web::get().to(profile));
 *
 * async fn profile(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let actor = RequireSession::extract_actor(&req)?;
 *     // ...
 * }
 * ```
 *
 * 令牌缺失、无效、过期或对应用户已删除时返回 401 `{"error": ...}`。
 */

use crate::errors::{Result, SchoolError};
use crate::models::ErrorResponse;
use crate::models::auth::entities::Actor;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct RequireSession;

// 辅助函数：创建错误响应
fn create_error_response(status: StatusCode, message: &str) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status).json(ErrorResponse::new(message)),
    }
}

// 辅助函数：提取并验证会话令牌，重新加载用户
async fn extract_and_validate_session(req: &ServiceRequest) -> std::result::Result<User, SchoolError> {
    let token = JwtUtils::extract_token(req.request())
        .ok_or_else(|| SchoolError::authentication("Authentication required"))?;

    let claims = JwtUtils::verify_token(&token).map_err(|err| {
        info!("Session token validation failed: {}", err);
        SchoolError::authentication("Invalid or expired session")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| SchoolError::authentication("Invalid session subject"))?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| SchoolError::internal("Storage not found in app data"))?
        .get_ref()
        .clone();

    storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| SchoolError::authentication("Session user no longer exists"))
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, "").map_into_right_body(),
                ));
            }

            match extract_and_validate_session(&req).await {
                Ok(user) => {
                    debug!("Session authenticated for user ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) if err.is_internal() => {
                    error!("Session check failed for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(err.status(), "Internal server error")
                            .map_into_right_body(),
                    ))
                }
                Err(err) => {
                    info!("Session rejected for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(err.status(), err.message()).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取会话用户
impl RequireSession {
    /// 从请求扩展中提取完整用户
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    /// 提取当前操作者，未经中间件认证时返回 401
    pub fn extract_actor(req: &actix_web::HttpRequest) -> Result<Actor> {
        req.extensions()
            .get::<User>()
            .map(Actor::from)
            .ok_or_else(|| SchoolError::authentication("Authentication required"))
    }
}
