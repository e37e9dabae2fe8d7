use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use tracing::info;

use super::ClassMemberService;
use crate::errors::{Result, SchoolError};
use crate::middlewares::RequireSession;
use crate::models::auth::entities::Actor;
use crate::models::class_members::{
    entities::{AssignOutcome, MemberKind},
    requests::{AssignStudentRequest, AssignTeacherRequest},
    responses::AssignResponse,
};
use crate::models::users::entities::UserRole;
use crate::policy::{self, Action, PolicyContext};
use crate::services::require_class;
use crate::storage::{Repository, run_in_transaction};
use crate::utils::validate::required;

/// 分配教师或学生到班级；重复分配返回 `AlreadyAssigned`，不产生重复行
pub async fn assign_member_in<C: ConnectionTrait>(
    conn: &C,
    actor: &Actor,
    kind: MemberKind,
    user_id: i64,
    class_id: i64,
) -> Result<AssignOutcome> {
    policy::ensure(actor, Action::AssignToClass, PolicyContext::default())?;

    let repo = Repository::new(conn);
    let user = repo
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| SchoolError::not_found(format!("User {user_id} not found")))?;

    let expected_role = match kind {
        MemberKind::Teacher => UserRole::Teacher,
        MemberKind::Student => UserRole::Student,
    };
    if user.role != expected_role {
        return Err(SchoolError::validation(format!(
            "User {user_id} is not a {kind}"
        )));
    }

    require_class(&repo, class_id).await?;

    let exists = match kind {
        MemberKind::Teacher => repo.teacher_link_exists(user_id, class_id).await?,
        MemberKind::Student => repo.student_link_exists(user_id, class_id).await?,
    };
    if exists {
        return Ok(AssignOutcome::AlreadyAssigned);
    }

    let link = match kind {
        MemberKind::Teacher => repo.insert_teacher_link(user_id, class_id).await?,
        MemberKind::Student => repo.insert_student_link(user_id, class_id).await?,
    };
    Ok(AssignOutcome::Created(link))
}

async fn assign(
    service: &ClassMemberService,
    request: &HttpRequest,
    kind: MemberKind,
    user_id: i64,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = RequireSession::extract_actor(request)?;
    let storage = service.get_storage(request);

    let outcome = run_in_transaction(storage.as_ref(), move |txn| {
        Box::pin(async move { assign_member_in(txn, &actor, kind, user_id, class_id).await })
    })
    .await?;

    match outcome {
        AssignOutcome::Created(link) => {
            info!(
                "{} {} assigned to class {} by user {}",
                kind, user_id, class_id, actor.id
            );
            Ok(HttpResponse::Created().json(AssignResponse {
                message: format!("{} assigned to class", capitalize(kind)),
                link: Some(link),
            }))
        }
        AssignOutcome::AlreadyAssigned => Ok(HttpResponse::Ok().json(AssignResponse {
            message: format!("{} already assigned to class", capitalize(kind)),
            link: None,
        })),
    }
}

fn capitalize(kind: MemberKind) -> &'static str {
    match kind {
        MemberKind::Teacher => "Teacher",
        MemberKind::Student => "Student",
    }
}

pub async fn assign_teacher(
    service: &ClassMemberService,
    request: &HttpRequest,
    data: AssignTeacherRequest,
) -> ActixResult<HttpResponse> {
    let teacher_id = required("teacher_id", data.teacher_id)?;
    let class_id = required("class_id", data.class_id)?;
    assign(service, request, MemberKind::Teacher, teacher_id, class_id).await
}

pub async fn assign_student(
    service: &ClassMemberService,
    request: &HttpRequest,
    data: AssignStudentRequest,
) -> ActixResult<HttpResponse> {
    let student_id = required("student_id", data.student_id)?;
    let class_id = required("class_id", data.class_id)?;
    assign(service, request, MemberKind::Student, student_id, class_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing;

    #[tokio::test]
    async fn test_assign_teacher_twice_is_noop() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let class = testing::seed_class(&db, "C1").await;
        let actor = Actor::from(&admin);

        let first = assign_member_in(&db, &actor, MemberKind::Teacher, teacher.id, class.id)
            .await
            .unwrap();
        assert!(matches!(first, AssignOutcome::Created(_)));

        let second = assign_member_in(&db, &actor, MemberKind::Teacher, teacher.id, class.id)
            .await
            .unwrap();
        assert_eq!(second, AssignOutcome::AlreadyAssigned);

        let classes = Repository::new(&db).classes_with_teachers().await.unwrap();
        assert_eq!(classes[0].teachers.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_validates_role_and_existence() {
        let db = testing::memory_db().await;
        let admin = testing::seed_user(&db, "root", UserRole::Admin).await;
        let student = testing::seed_user(&db, "stud", UserRole::Student).await;
        let class = testing::seed_class(&db, "C1").await;
        let actor = Actor::from(&admin);

        let err = assign_member_in(&db, &actor, MemberKind::Teacher, student.id, class.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::Validation(_)));

        let err = assign_member_in(&db, &actor, MemberKind::Student, student.id, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));

        let err = assign_member_in(&db, &actor, MemberKind::Student, 999, class.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolError::NotFound(_)));

        assert!(matches!(
            assign_member_in(&db, &actor, MemberKind::Student, student.id, class.id)
                .await
                .unwrap(),
            AssignOutcome::Created(_)
        ));
    }

    #[tokio::test]
    async fn test_only_admin_assigns() {
        let db = testing::memory_db().await;
        let teacher = testing::seed_user(&db, "teach", UserRole::Teacher).await;
        let class = testing::seed_class(&db, "C1").await;

        let err = assign_member_in(
            &db,
            &Actor::from(&teacher),
            MemberKind::Teacher,
            teacher.id,
            class.id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SchoolError::Forbidden(_)));
    }
}
