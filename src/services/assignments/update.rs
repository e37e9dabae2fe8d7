use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::get::require_assignment;
use super::{AssignmentService, normalize_description};
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentChanges, UpdateAssignmentRequest},
};
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::{check, parse_due_date, required_text, validate_title};

/// 校验部分更新：出现的字段按创建时的规则校验
fn validate_changes(req: UpdateAssignmentRequest) -> Result<AssignmentChanges> {
    let title = match req.title {
        Some(title) => {
            let title = required_text("title", Some(title))?;
            check(validate_title(&title))?;
            Some(title)
        }
        None => None,
    };

    let due_date = match req.due_date {
        Some(due_date) => Some(parse_due_date(&required_text("due_date", Some(due_date))?)?),
        None => None,
    };

    Ok(AssignmentChanges {
        class_id: req.class_id,
        title,
        // 显式传入空描述时清空
        description: req.description.map(|d| normalize_description(Some(d))),
        due_date,
    })
}

pub async fn update_assignment_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    assignment_id: i64,
    req: UpdateAssignmentRequest,
) -> Result<Assignment> {
    let changes = validate_changes(req)?;

    policy::ensure(
        actor,
        Action::Assignment(Operation::Update),
        PolicyContext::default(),
    )?;

    let repo = Repository::new(conn);
    let existing = require_assignment(&repo, assignment_id).await?;

    if let Some(class_id) = changes.class_id {
        require_class(&repo, class_id).await?;

        // 成绩的学生必须属于作业所在班级，已有成绩的作业不可换班
        if class_id != existing.class_id {
            let grades = repo.count_grades_for_assignment(assignment_id).await?;
            if grades > 0 {
                return Err(SchoolError::conflict(format!(
                    "Assignment {assignment_id} has {grades} grade(s) and cannot move to another class"
                )));
            }
        }
    }

    repo.update_assignment(assignment_id, changes).await
}

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let assignment = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { update_assignment_in(txn, &actor, assignment_id, data).await })
    })
    .await?;

    info!("Assignment {} updated by user {}", assignment.id, actor.id);
    Ok(HttpResponse::Ok().json(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;
    use crate::utils::validate::parse_due_date;

    async fn seed_assignment<C: ConnectionTrait>(conn: &C, class_id: i64) -> Assignment {
        Repository::new(conn)
            .insert_assignment(NewAssignment {
                class_id,
                title: "Essay".into(),
                description: Some("five pages".into()),
                due_date: parse_due_date("2026-11-01").unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let class = testing::seed_class(&db, "C1").await;
        let assignment = seed_assignment(&db, class.id).await;

        let updated = update_assignment_in(
            &db,
            &Actor::from(&teacher),
            assignment.id,
            UpdateAssignmentRequest {
                title: Some("Short essay".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Short essay");
        assert_eq!(updated.description.as_deref(), Some("five pages"));
        assert_eq!(updated.due_date, assignment.due_date);
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let class = testing::seed_class(&db, "C1").await;
        let assignment = seed_assignment(&db, class.id).await;

        let updated = update_assignment_in(
            &db,
            &Actor::from(&admin),
            assignment.id,
            UpdateAssignmentRequest {
                description: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_input() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let class = testing::seed_class(&db, "C1").await;
        let assignment = seed_assignment(&db, class.id).await;
        let actor = Actor::from(&admin);

        let err = update_assignment_in(
            &db,
            &actor,
            assignment.id,
            UpdateAssignmentRequest {
                title: Some("   ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err, SchoolError::validation("title is required"));

        let err = update_assignment_in(
            &db,
            &actor,
            assignment.id,
            UpdateAssignmentRequest {
                class_id: Some(404),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));

        let err = update_assignment_in(&db, &actor, 999, UpdateAssignmentRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_graded_assignment_cannot_change_class() {
        let db = testing::memory_db().await;
        let outsider = testing::seed_user(&db, "outsider", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let source = testing::seed_class(&db, "C1").await;
        let target = testing::seed_class(&db, "C2").await;
        testing::link_teacher(&db, outsider.id, target.id).await;
        testing::enroll_student(&db, student.id, source.id).await;

        let assignment = seed_assignment(&db, source.id).await;
        let repo = Repository::new(&db);
        let grade = repo.insert_grade(assignment.id, student.id, 40.0).await.unwrap();

        let err = update_assignment_in(
            &db,
            &Actor::from(&outsider),
            assignment.id,
            UpdateAssignmentRequest {
                class_id: Some(target.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SchoolError::Conflict(_)));

        let unchanged = repo.find_assignment_by_id(assignment.id).await.unwrap().unwrap();
        assert_eq!(unchanged.class_id, source.id);
        let kept = repo.find_grade_by_id(grade.id).await.unwrap().unwrap();
        assert_eq!(kept.score, 40.0);

        // 仍可修改其他字段，班级不变也不算换班
        let updated = update_assignment_in(
            &db,
            &Actor::from(&outsider),
            assignment.id,
            UpdateAssignmentRequest {
                class_id: Some(source.id),
                title: Some("Revised essay".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.class_id, source.id);
        assert_eq!(updated.title, "Revised essay");
    }

    #[tokio::test]
    async fn test_ungraded_assignment_can_change_class() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let source = testing::seed_class(&db, "C1").await;
        let target = testing::seed_class(&db, "C2").await;
        let assignment = seed_assignment(&db, source.id).await;

        let moved = update_assignment_in(
            &db,
            &Actor::from(&admin),
            assignment.id,
            UpdateAssignmentRequest {
                class_id: Some(target.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.class_id, target.id);
    }
}
