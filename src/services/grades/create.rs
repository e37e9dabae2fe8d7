use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::{GradeService, ensure_grade_write};
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::grades::{entities::Grade, requests::CreateGradeRequest};
use crate::policy::{self, Action, Operation};
use crate::services::require_enrolled_student;
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, required, validate_score};

/// 录入成绩：教师需关联作业所属班级，学生需已加入该班级
pub async fn create_grade_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    req: CreateGradeRequest,
) -> Result<Grade> {
    let assignment_id = required("assignment_id", req.assignment_id)?;
    let student_id = required("student_id", req.student_id)?;
    let score = required("score", req.score)?;
    check(validate_score(score))?;

    policy::ensure_role_may(actor, Action::Grade(Operation::Create))?;

    let repo = Repository::new(conn);
    let class_id = ensure_grade_write(&repo, actor, Operation::Create, assignment_id).await?;
    require_enrolled_student(&repo, student_id, class_id).await?;

    if repo
        .find_grade_by_key(assignment_id, student_id)
        .await?
        .is_some()
    {
        return Err(SchoolError::duplicate_identity(format!(
            "Grade for student {student_id} on assignment {assignment_id} already exists"
        )));
    }

    repo.insert_grade(assignment_id, student_id, score).await
}

pub async fn create_grade(
    service: &GradeService,
    request: &HttpRequest,
    data: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let grade = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { create_grade_in(txn, &actor, data).await })
    })
    .await?;

    info!(
        "Grade {} recorded for student {} on assignment {} by user {}",
        grade.id, grade.student_id, grade.assignment_id, actor.id
    );
    Ok(HttpResponse::Created().json(grade))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::{entities::Assignment, requests::NewAssignment};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;
    use crate::utils::validate::parse_due_date;
    use sea_orm::DatabaseConnection;

    async fn seed_assignment(db: &DatabaseConnection, class_id: i64) -> Assignment {
        Repository::new(db)
            .insert_assignment(NewAssignment {
                class_id,
                title: "Quiz".into(),
                description: None,
                due_date: parse_due_date("2026-11-01").unwrap(),
            })
            .await
            .unwrap()
    }

    fn request(assignment_id: i64, student_id: i64, score: f64) -> CreateGradeRequest {
        CreateGradeRequest {
            assignment_id: Some(assignment_id),
            student_id: Some(student_id),
            score: Some(score),
        }
    }

    #[tokio::test]
    async fn test_assigned_teacher_grades_enrolled_student() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        testing::link_teacher(&db, teacher.id, class.id).await;
        testing::enroll_student(&db, student.id, class.id).await;
        let assignment = seed_assignment(&db, class.id).await;
        let actor = Actor::from(&teacher);

        let grade = create_grade_in(&db, &actor, request(assignment.id, student.id, 87.5))
            .await
            .unwrap();
        assert_eq!(grade.score, 87.5);

        let err = create_grade_in(&db, &actor, request(assignment.id, student.id, 90.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn test_grade_checks() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let assignment = seed_assignment(&db, class.id).await;

        let err = create_grade_in(&db, &Actor::from(&admin), request(assignment.id, student.id, -1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));

        let err = create_grade_in(&db, &Actor::from(&admin), request(999, student.id, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));

        let err = create_grade_in(&db, &Actor::from(&admin), request(assignment.id, student.id, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));

        let err = create_grade_in(&db, &Actor::from(&teacher), request(assignment.id, student.id, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));

        let err = create_grade_in(&db, &Actor::from(&student), request(assignment.id, student.id, 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
    }
}
