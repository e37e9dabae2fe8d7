use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;

use super::AttendanceService;
use crate::errors::Result;
use crate::middlewares::RequireSession;
use crate::models::attendance::{
    entities::AttendanceRecord,
    requests::{AttendanceFilter, AttendanceListQuery},
    responses::AttendanceListResponse,
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::parse_date;

pub async fn list_attendance_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    query: AttendanceListQuery,
) -> Result<Vec<AttendanceRecord>> {
    policy::ensure(
        actor,
        Action::Attendance(Operation::View),
        PolicyContext::default(),
    )?;

    let date = query.date.as_deref().map(parse_date).transpose()?;
    let filter = AttendanceFilter {
        class_id: query.class_id,
        student_id: query.student_id,
        date,
    };

    Repository::new(conn).list_attendance(filter).await
}

pub async fn list_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceListQuery,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let attendance = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { list_attendance_in(txn, &actor, query).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse { attendance }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchoolError;
    use crate::models::attendance::{entities::AttendanceStatus, requests::NewAttendance};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;

    #[tokio::test]
    async fn test_list_attendance_filters() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let repo = Repository::new(&db);

        for day in ["2026-10-01", "2026-10-02"] {
            repo.insert_attendance(NewAttendance {
                class_id: class.id,
                student_id: student.id,
                date: parse_date(day).unwrap(),
                status: AttendanceStatus::Present,
                recorded_by: admin.id,
            })
            .await
            .unwrap();
        }

        let actor = Actor::from(&admin);
        let all = list_attendance_in(&db, &actor, AttendanceListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let one_day = list_attendance_in(
            &db,
            &actor,
            AttendanceListQuery {
                date: Some("2026-10-02".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(one_day.len(), 1);

        let err = list_attendance_in(
            &db,
            &actor,
            AttendanceListQuery {
                date: Some("02/10/2026".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));
    }
}
