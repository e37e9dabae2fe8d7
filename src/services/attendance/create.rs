use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::{AttendanceService, parse_status};
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{CreateAttendanceRequest, NewAttendance},
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation};
use crate::services::{class_context, require_class, require_enrolled_student};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{parse_date, required, required_text};

/// 记录考勤：教师只能为自己关联的班级记录，学生必须已加入该班级
pub async fn create_attendance_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    req: CreateAttendanceRequest,
) -> Result<AttendanceRecord> {
    let class_id = required("class_id", req.class_id)?;
    let student_id = required("student_id", req.student_id)?;
    let date = parse_date(&required_text("date", req.date)?)?;
    let status = parse_status(&required_text("status", req.status)?)?;

    let action = Action::Attendance(Operation::Create);
    policy::ensure_role_may(actor, action)?;

    let repo = Repository::new(conn);
    require_class(&repo, class_id).await?;
    let ctx = class_context(&repo, actor, class_id).await?;
    policy::ensure(actor, action, ctx)?;

    require_enrolled_student(&repo, student_id, class_id).await?;

    if repo
        .find_attendance_by_key(class_id, student_id, date)
        .await?
        .is_some()
    {
        return Err(SchoolError::duplicate_identity(format!(
            "Attendance for student {student_id} in class {class_id} on {date} already exists"
        )));
    }

    repo.insert_attendance(NewAttendance {
        class_id,
        student_id,
        date,
        status,
        recorded_by: actor.id,
    })
    .await
}

pub async fn create_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    data: CreateAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let record = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_attendance_in(txn, &actor, data).await })
    })
    .await?;

    info!(
        "Attendance {} recorded for student {} in class {} by user {}",
        record.id, record.student_id, record.class_id, actor.id
    );
    Ok(HttpResponse::Created().json(record))
}
