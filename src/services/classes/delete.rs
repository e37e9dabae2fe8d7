use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::ClassService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::MessageResponse;
use crate::models::auth::entities::Actor;
use crate::policy::{self, Action, Operation, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};

/// 删除班级：教师/学生关联随之删除，仍有作业或考勤引用时拒绝
pub async fn delete_class_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    class_id: i64,
) -> Result<()> {
    policy::ensure(actor, Action::Class(Operation::Delete), PolicyContext::default())?;

    let repo = Repository::new(conn);
    require_class(&repo, class_id).await?;

    let assignments = repo.count_assignments_in_class(class_id).await?;
    let attendance = repo.count_attendance_in_class(class_id).await?;
    if assignments > 0 || attendance > 0 {
        return Err(SchoolError::conflict(format!(
            "Class {class_id} is still referenced by {assignments} assignment(s) and {attendance} attendance record(s)"
        )));
    }

    repo.delete_class(class_id).await?;
    Ok(())
}

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { delete_class_in(txn, &actor, class_id).await })
    })
    .await?;

    info!("Class {} deleted by user {}", class_id, actor.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("Class deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing;

    #[tokio::test]
    async fn test_delete_blocked_by_assignments() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let actor = Actor::from(&admin);
        let class = testing::seed_class(&db, "C1").await;
        Repository::new(&db)
            .insert_assignment(NewAssignment {
                class_id: class.id,
                title: "HW1".into(),
                description: None,
                due_date: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let err = delete_class_in(&db, &actor, class.id).await.unwrap_err();
        assert!(matches!(err, SchoolError::Conflict(_)));
        assert!(
            Repository::new(&db)
                .find_class_by_id(class.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_links() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let class = testing::seed_class(&db, "C1").await;
        testing::link_teacher(&db, teacher.id, class.id).await;

        delete_class_in(&db, &Actor::from(&admin), class.id)
            .await
            .unwrap();
        let repo = Repository::new(&db);
        assert!(repo.find_class_by_id(class.id).await.unwrap().is_none());
        assert!(
            !repo
                .teacher_link_exists(teacher.id, class.id)
                .await
                .unwrap()
        );

        let err = delete_class_in(&db, &Actor::from(&admin), class.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));
    }
}
