use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::AttendanceService;
use super::get::require_attendance;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::MessageResponse;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation};
use crate::services::class_context;
use crate::storage::{Repository, run_in_transaction};

pub async fn delete_attendance_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    attendance_id: i64,
) -> Result<()> {
    let action = Action::Attendance(Operation::Delete);
    policy::ensure_role_may(actor, action)?;

    let repo = Repository::new(conn);
    let record = require_attendance(&repo, attendance_id).await?;
    let ctx = class_context(&repo, actor, record.class_id).await?;
    policy::ensure(actor, action, ctx)?;

    repo.delete_attendance(attendance_id).await?;
    Ok(())
}

pub async fn delete_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { delete_attendance_in(txn, &actor, attendance_id).await })
    })
    .await?;

    info!("Attendance {} deleted by user {}", attendance_id, actor.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Attendance deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchoolError;
    use crate::models::attendance::{entities::AttendanceStatus, requests::NewAttendance};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;
    use crate::utils::validate::parse_date;

    #[tokio::test]
    async fn test_delete_requires_assignment_to_class() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let repo = Repository::new(&db);
        let record = repo
            .insert_attendance(NewAttendance {
                class_id: class.id,
                student_id: student.id,
                date: parse_date("2026-10-05").unwrap(),
                status: AttendanceStatus::Absent,
                recorded_by: teacher.id,
            })
            .await
            .unwrap();
        let actor = Actor::from(&teacher);

        let err = delete_attendance_in(&db, &actor, record.id).await.unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));

        testing::link_teacher(&db, teacher.id, class.id).await;
        delete_attendance_in(&db, &actor, record.id).await.unwrap();
        assert!(repo.find_attendance_by_id(record.id).await.unwrap().is_none());
    }
}
