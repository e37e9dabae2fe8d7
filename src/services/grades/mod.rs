pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use sea_orm::ConnectionTrait;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::auth::entities::Actor;
use crate::models::grades::requests::{CreateGradeRequest, GradeListQuery, UpdateGradeRequest};
use crate::policy::{self, Action, Operation};
use crate::services::assignments::get::require_assignment;
use crate::services::class_context;
use crate::storage::{Repository, Storage};

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 列出成绩
    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        query: GradeListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, query).await
    }

    // 录入成绩
    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        data: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, request, data).await
    }

    // 获取成绩详情
    pub async fn get_grade(&self, request: &HttpRequest, grade_id: i64) -> ActixResult<HttpResponse> {
        get::get_grade(self, request, grade_id).await
    }

    // 修改成绩
    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        data: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, request, grade_id, data).await
    }

    // 删除成绩
    pub async fn delete_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, request, grade_id).await
    }
}

/// 成绩写操作的判定上下文来自作业所属班级
pub(crate) async fn ensure_grade_write<C: ConnectionTrait>(
    repo: &Repository<'_, C>,
    actor: &Actor,
    operation: Operation,
    assignment_id: i64,
) -> Result<i64> {
    let assignment = require_assignment(repo, assignment_id).await?;
    let ctx = class_context(repo, actor, assignment.class_id).await?;
    policy::ensure(actor, Action::Grade(operation), ctx)?;
    Ok(assignment.class_id)
}
