pub mod assign;
pub mod overview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::class_members::requests::{AssignStudentRequest, AssignTeacherRequest};
use crate::storage::Storage;

pub struct ClassMemberService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassMemberService {
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

    // 分配教师到班级
    pub async fn assign_teacher(
        &self,
        request: &HttpRequest,
        data: AssignTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_teacher(self, request, data).await
    }

    // 分配学生到班级
    pub async fn assign_student(
        &self,
        request: &HttpRequest,
        data: AssignStudentRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_student(self, request, data).await
    }

    // 班级及其教师
    pub async fn classes_and_teachers(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::classes_and_teachers(self, request).await
    }

    // 学生及其班级
    pub async fn students_and_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::students_and_classes(self, request).await
    }
}
