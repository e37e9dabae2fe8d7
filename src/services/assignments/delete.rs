use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::AssignmentService;
use super::get::require_assignment;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::MessageResponse;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::storage::{Repository, run_in_transaction};

pub async fn delete_assignment_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    assignment_id: i64,
) -> Result<()> {
    policy::ensure(
        actor,
        Action::Assignment(Operation::Delete),
        PolicyContext::default(),
    )?;

    let repo = Repository::new(conn);
    require_assignment(&repo, assignment_id).await?;

    // 已有成绩引用的作业不可删除
    let grades = repo.count_grades_for_assignment(assignment_id).await?;
    if grades > 0 {
        return Err(SchoolError::conflict(format!(
            "Assignment {assignment_id} still has {grades} grade(s)"
        )));
    }

    repo.delete_assignment(assignment_id).await?;
    Ok(())
}

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { delete_assignment_in(txn, &actor, assignment_id).await })
    })
    .await?;

    info!("Assignment {} deleted by user {}", assignment_id, actor.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Assignment deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;
    use crate::utils::validate::parse_due_date;

    #[tokio::test]
    async fn test_delete_assignment_with_grades_conflicts() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let repo = Repository::new(&db);
        let assignment = repo
            .insert_assignment(NewAssignment {
                class_id: class.id,
                title: "Quiz".into(),
                description: None,
                due_date: parse_due_date("2026-11-01").unwrap(),
            })
            .await
            .unwrap();
        let actor = Actor::from(&teacher);

        let grade = repo.insert_grade(assignment.id, student.id, 9.5).await.unwrap();
        let err = delete_assignment_in(&db, &actor, assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Conflict(_)));

        repo.delete_grade(grade.id).await.unwrap();
        delete_assignment_in(&db, &actor, assignment.id).await.unwrap();
        assert!(repo.find_assignment_by_id(assignment.id).await.unwrap().is_none());

        let err = delete_assignment_in(&db, &actor, assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
    }
}
