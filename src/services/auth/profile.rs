use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::SchoolError;
use crate::middlewares::RequireSession;
use crate::models::auth::responses::ProfileResponse;

pub async fn handle_profile(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = RequireSession::extract_user(request)
        .ok_or_else(|| SchoolError::authentication("Authentication required"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        username: user.username,
        role: user.role,
    }))
}
