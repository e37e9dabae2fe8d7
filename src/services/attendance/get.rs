use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::AttendanceService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::attendance::entities::AttendanceRecord;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

/// 解析考勤记录，不存在时返回 NotFound
pub(crate) async fn require_attendance<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    attendance_id: i64,
) -> Result<AttendanceRecord> {
    repo.find_attendance_by_id(attendance_id)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!("Attendance record {attendance_id} not found"))
        })
}

pub async fn get_attendance_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    attendance_id: i64,
) -> Result<AttendanceRecord> {
    policy::ensure(
        actor,
        Action::Attendance(Operation::View),
        PolicyContext::default(),
    )?;
    require_attendance(&Repository::new(conn), attendance_id).await
}

pub async fn get_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let record = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { get_attendance_in(txn, &actor, attendance_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(record))
}
