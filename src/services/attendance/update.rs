use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::get::require_attendance;
use super::{AttendanceService, parse_status};
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{NewAttendance, UpdateAttendanceRequest},
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation};
use crate::services::{class_context, require_class, require_enrolled_student};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{parse_date, required_text};

/// 部分更新考勤：教师需同时关联原班级与目标班级
pub async fn update_attendance_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    attendance_id: i64,
    req: UpdateAttendanceRequest,
) -> Result<AttendanceRecord> {
    let date = match req.date {
        Some(date) => Some(parse_date(&required_text("date", Some(date))?)?),
        None => None,
    };
    let status = match req.status {
        Some(status) => Some(parse_status(&required_text("status", Some(status))?)?),
        None => None,
    };

    let action = Action::Attendance(Operation::Update);
    policy::ensure_role_may(actor, action)?;

    let repo = Repository::new(conn);
    let existing = require_attendance(&repo, attendance_id).await?;
    let ctx = class_context(&repo, actor, existing.class_id).await?;
    policy::ensure(actor, action, ctx)?;

    let merged = NewAttendance {
        class_id: req.class_id.unwrap_or(existing.class_id),
        student_id: req.student_id.unwrap_or(existing.student_id),
        date: date.unwrap_or(existing.date),
        status: status.unwrap_or(existing.status),
        recorded_by: actor.id,
    };

    if merged.class_id != existing.class_id {
        require_class(&repo, merged.class_id).await?;
        let ctx = class_context(&repo, actor, merged.class_id).await?;
        policy::ensure(actor, action, ctx)?;
    }

    if merged.class_id != existing.class_id || merged.student_id != existing.student_id {
        require_enrolled_student(&repo, merged.student_id, merged.class_id).await?;
    }

    if let Some(other) = repo
        .find_attendance_by_key(merged.class_id, merged.student_id, merged.date)
        .await?
        && other.id != attendance_id
    {
        return Err(SchoolError::duplicate_identity(format!(
            "Attendance for student {} in class {} on {} already exists",
            merged.student_id, merged.class_id, merged.date
        )));
    }

    repo.update_attendance(attendance_id, merged).await
}

pub async fn update_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_id: i64,
    data: UpdateAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let record = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { update_attendance_in(txn, &actor, attendance_id, data).await })
    })
    .await?;

    info!("Attendance {} updated by user {}", record.id, actor.id);
    Ok(HttpResponse::Ok().json(record))
}
